//! GST Computation
//!
//! Per-line GST amounts and the CGST/SGST vs IGST split. Amounts here are
//! full-precision decimals in minor units; rounding happens once, when the
//! order summary is assembled.

use rust_decimal::Decimal;

use crate::destination::Destination;

/// Whether a line is taxed intra-state or inter-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxJurisdiction {
    /// Buyer and seller state match inside the GST regime: GST splits
    /// evenly into CGST + SGST.
    IntraState,

    /// Inter-state, cross-border, or state unknown: the whole amount is
    /// IGST. Unknown always lands here — the split that never
    /// under-collects.
    InterState,
}

/// Decide the jurisdiction for a line shipped from `seller_state`.
///
/// First-party warehouse stock carries no seller state and therefore prices
/// on the IGST branch, as does any destination whose state is unknown.
#[must_use]
pub fn jurisdiction(destination: &Destination, seller_state: Option<&str>) -> TaxJurisdiction {
    if !destination.is_domestic() {
        return TaxJurisdiction::InterState;
    }

    match (destination.state(), seller_state) {
        (Some(buyer), Some(seller)) if buyer == seller => TaxJurisdiction::IntraState,
        _ => TaxJurisdiction::InterState,
    }
}

/// A line's GST amount split across the three components, in full-precision
/// minor units. Exactly one of `{cgst + sgst, igst}` is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxSplit {
    /// Central GST component.
    pub cgst: Decimal,

    /// State GST component.
    pub sgst: Decimal,

    /// Integrated GST component.
    pub igst: Decimal,
}

impl TaxSplit {
    /// A zero split, used for zero-rated lines.
    pub const ZERO: Self = Self {
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
    };

    /// The total GST across all three components.
    #[must_use]
    pub fn gst_amount(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

/// GST owed on an adjusted line subtotal, unrounded.
#[must_use]
pub fn line_gst_minor(adjusted_subtotal_minor: i64, gst_percent: Decimal) -> Decimal {
    Decimal::from(adjusted_subtotal_minor) * gst_percent / Decimal::ONE_HUNDRED
}

/// Split a line's GST amount for the given jurisdiction.
#[must_use]
pub fn split_gst(gst_minor: Decimal, jurisdiction: TaxJurisdiction) -> TaxSplit {
    match jurisdiction {
        TaxJurisdiction::IntraState => {
            let half = gst_minor / Decimal::TWO;

            TaxSplit {
                cgst: half,
                sgst: half,
                igst: Decimal::ZERO,
            }
        }
        TaxJurisdiction::InterState => TaxSplit {
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: gst_minor,
        },
    }
}
