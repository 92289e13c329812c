//! Revenue split arithmetic

use crate::contract::{
    DistributionError, EffectiveSplit, SplitAllocation, SplitConfig, SplitOverride, SplitParty,
    SplitSource,
};
use rust_decimal::{Decimal, RoundingStrategy};

pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Money is carried with two decimal places
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn validate_percentage(value: Decimal) -> Result<(), DistributionError> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(DistributionError::validation(
            "Percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

/// Artist and label percentages must each be within range and sum to 100
pub fn validate_split_config(artist: Decimal, label: Decimal) -> Result<(), DistributionError> {
    validate_percentage(artist)?;
    validate_percentage(label)?;
    if artist + label != HUNDRED {
        return Err(DistributionError::validation(
            "Artist and label percentages must add up to 100%",
        ));
    }
    Ok(())
}

pub fn complement(percentage: Decimal) -> Decimal {
    HUNDRED - percentage
}

/// Build the (artist, label) pair for an override on one side of the split
pub fn override_percentages(
    party: SplitParty,
    percentage: Decimal,
) -> Result<(Decimal, Decimal), DistributionError> {
    validate_percentage(percentage)?;
    Ok(match party {
        SplitParty::Artist => (percentage, complement(percentage)),
        SplitParty::Label => (complement(percentage), percentage),
    })
}

/// Artist override beats label override beats company defaults
pub fn resolve_effective_split(
    defaults: &SplitConfig,
    artist_override: Option<&SplitOverride>,
    label_override: Option<&SplitOverride>,
) -> EffectiveSplit {
    if let Some(o) = artist_override.filter(|o| o.is_active) {
        return EffectiveSplit {
            artist_percentage: o.artist_percentage,
            label_percentage: o.label_percentage,
            source: SplitSource::ArtistOverride,
        };
    }
    if let Some(o) = label_override.filter(|o| o.is_active) {
        return EffectiveSplit {
            artist_percentage: o.artist_percentage,
            label_percentage: o.label_percentage,
            source: SplitSource::LabelOverride,
        };
    }
    EffectiveSplit {
        artist_percentage: defaults.artist_percentage,
        label_percentage: defaults.label_percentage,
        source: SplitSource::Default,
    }
}

/// Allocate a gross earning across artist, label and company.
///
/// The artist share is rounded; the label receives the remainder so no cent
/// is lost. Without a label the remainder stays with the company.
pub fn allocate(
    gross: Decimal,
    split: &EffectiveSplit,
    has_label: bool,
) -> Result<SplitAllocation, DistributionError> {
    if gross <= Decimal::ZERO {
        return Err(DistributionError::validation("Amount must be positive"));
    }
    let gross = round_money(gross);
    let artist_share = gross
        .checked_mul(split.artist_percentage)
        .and_then(|scaled| scaled.checked_div(HUNDRED))
        .map(round_money)
        .ok_or_else(|| DistributionError::validation("Amount is too large"))?;
    let remainder = gross - artist_share;

    Ok(if has_label {
        SplitAllocation {
            artist_share,
            label_share: remainder,
            company_share: Decimal::ZERO,
        }
    } else {
        SplitAllocation {
            artist_share,
            label_share: Decimal::ZERO,
            company_share: remainder,
        }
    })
}
