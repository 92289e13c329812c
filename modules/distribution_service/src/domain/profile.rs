//! Profile edits and the identity lock

use crate::contract::{
    DistributionError, ProfileDetails, ProfileLockStatus, ProfileUpdate, UserProfile,
};
use chrono::{DateTime, Utc};

/// Fields frozen while a profile is locked. The display name stays editable.
pub const IDENTITY_FIELDS: [&str; 5] = [
    "first_name",
    "last_name",
    "date_of_birth",
    "nationality",
    "city",
];

const MAX_NAME_LEN: usize = 100;
const MAX_BIO_LEN: usize = 2000;

/// Apply `update` to `profile`, returning the new profile.
///
/// Changing a locked field fails with `Forbidden` unless `bypass_lock` is set
/// (administrators). Writing the value a locked field already holds is not a
/// change.
pub fn apply_update(
    profile: &UserProfile,
    update: ProfileUpdate,
    bypass_lock: bool,
    now: DateTime<Utc>,
) -> Result<UserProfile, DistributionError> {
    let mut next = profile.clone();

    if let Some(name) = update.display_name {
        next.display_name = cleaned("display_name", name, MAX_NAME_LEN)?;
    }

    let details = &mut next.details;
    let texts = [
        (&mut details.first_name, update.first_name, "first_name", MAX_NAME_LEN),
        (&mut details.last_name, update.last_name, "last_name", MAX_NAME_LEN),
        (&mut details.nationality, update.nationality, "nationality", MAX_NAME_LEN),
        (&mut details.country, update.country, "country", MAX_NAME_LEN),
        (&mut details.city, update.city, "city", MAX_NAME_LEN),
        (&mut details.phone, update.phone, "phone", MAX_NAME_LEN),
        (&mut details.bio, update.bio, "bio", MAX_BIO_LEN),
    ];
    for (slot, value, field, max_len) in texts {
        if let Some(value) = value {
            *slot = cleaned(field, value, max_len)?;
        }
    }

    if let Some(born) = update.date_of_birth {
        if born > now.date_naive() {
            return Err(DistributionError::validation(
                "Date of birth cannot be in the future",
            ));
        }
        details.date_of_birth = Some(born);
    }

    if !bypass_lock {
        if let Some(field) = changed_fields(&profile.details, &next.details)
            .into_iter()
            .find(|field| profile.locked_fields.iter().any(|locked| locked == field))
        {
            return Err(DistributionError::forbidden(format!(
                "Profile field '{}' is locked",
                field
            )));
        }
    }

    if update.lock_identity {
        if next.details.first_name.is_none() || next.details.last_name.is_none() {
            return Err(DistributionError::validation(
                "First and last name are required before the profile can be locked",
            ));
        }
        next = set_lock(&next, true, now);
    }

    next.updated_at = now;
    Ok(next)
}

/// Lock or unlock the identity fields
pub fn set_lock(profile: &UserProfile, locked: bool, now: DateTime<Utc>) -> UserProfile {
    let (locked_fields, status) = if locked {
        (
            IDENTITY_FIELDS.iter().map(|f| f.to_string()).collect(),
            ProfileLockStatus::Locked,
        )
    } else {
        (Vec::new(), ProfileLockStatus::Unlocked)
    };

    UserProfile {
        locked_fields,
        profile_lock_status: status,
        updated_at: now,
        ..profile.clone()
    }
}

/// Names of the detail fields that differ between `before` and `after`
pub fn changed_fields(before: &ProfileDetails, after: &ProfileDetails) -> Vec<&'static str> {
    [
        ("first_name", before.first_name != after.first_name),
        ("last_name", before.last_name != after.last_name),
        ("date_of_birth", before.date_of_birth != after.date_of_birth),
        ("nationality", before.nationality != after.nationality),
        ("country", before.country != after.country),
        ("city", before.city != after.city),
        ("phone", before.phone != after.phone),
        ("bio", before.bio != after.bio),
    ]
    .into_iter()
    .filter_map(|(field, changed)| changed.then_some(field))
    .collect()
}

fn cleaned(
    field: &str,
    value: String,
    max_len: usize,
) -> Result<Option<String>, DistributionError> {
    let value = value.trim();
    if value.chars().count() > max_len {
        return Err(DistributionError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok((!value.is_empty()).then(|| value.to_string()))
}
