use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{round_money, Money, Percent};

/// Ad Valorem duty on the customs (CIF) value.
pub const AD_VALOREM_RATE: Decimal = dec!(0.04);
/// Municipal promotion tax (IPM) on CIF + Ad Valorem.
pub const IPM_RATE: Decimal = dec!(0.02);
/// General sales tax (IGV) on CIF + Ad Valorem.
pub const IGV_RATE: Decimal = dec!(0.16);

pub(crate) const HUNDRED: Decimal = dec!(100);

/// Customs duties owed under the simplified regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyBreakdown {
    /// Insurance: FOB * insurance% / 100
    pub insurance_total: Money,
    /// Customs value: FOB + freight + insurance
    pub customs_value_cif: Money,
    pub ad_valorem: Money,
    pub ipm: Money,
    pub igv: Money,
    /// Ad Valorem + IPM + IGV
    pub total_duties: Money,
}

impl DutyBreakdown {
    /// Stack the three duty tiers in order: Ad Valorem, then IPM and IGV on
    /// the CIF value plus Ad Valorem. Amounts are left unrounded.
    pub(crate) fn assess(
        fob_value: Money,
        freight_plus_fob: Money,
        insurance_percent: Percent,
    ) -> Self {
        let insurance_total = fob_value.saturating_mul(insurance_percent) / HUNDRED;
        let customs_value_cif = freight_plus_fob.saturating_add(insurance_total);
        let ad_valorem = customs_value_cif * AD_VALOREM_RATE;
        let taxable_base = customs_value_cif.saturating_add(ad_valorem);
        let ipm = taxable_base * IPM_RATE;
        let igv = taxable_base * IGV_RATE;
        let total_duties = ad_valorem.saturating_add(ipm).saturating_add(igv);

        DutyBreakdown {
            insurance_total,
            customs_value_cif,
            ad_valorem,
            ipm,
            igv,
            total_duties,
        }
    }

    pub(crate) fn rounded(self) -> Self {
        DutyBreakdown {
            insurance_total: round_money(self.insurance_total),
            customs_value_cif: round_money(self.customs_value_cif),
            ad_valorem: round_money(self.ad_valorem),
            ipm: round_money(self.ipm),
            igv: round_money(self.igv),
            total_duties: round_money(self.total_duties),
        }
    }
}
