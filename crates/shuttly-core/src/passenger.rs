// ── Passenger details & validation ──
//
// One record per selected seat, tagged with the seat id for
// traceability. Validation runs before any network call and reports
// the first violation with the offending field or passenger named.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum PaymentMethod {
    Online,
    #[default]
    Cash,
}

/// Details for one passenger, attached to one selected seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetail {
    pub seat_id: String,
    pub name: String,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
}

impl PassengerDetail {
    pub fn empty(seat_id: String) -> Self {
        Self {
            seat_id,
            name: String::new(),
            age: None,
            gender: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
}

/// Oldest and youngest bookable ages, inclusive.
const AGE_RANGE: std::ops::RangeInclusive<u8> = 1..=120;

/// Validate contact details and passenger records against a selection
/// of `seat_count` seats. Returns the first violation as a
/// human-readable message; `Ok(())` means submission may proceed.
pub fn validate_details(
    contact: &ContactDetails,
    passengers: &[PassengerDetail],
    seat_count: usize,
) -> Result<(), String> {
    if !is_plausible_email(&contact.email) {
        return Err("contact email must look like name@example.com".into());
    }
    if contact.phone.trim().is_empty() {
        return Err("contact phone is required".into());
    }
    if passengers.len() != seat_count {
        return Err(format!(
            "passenger details incomplete: {} passengers for {} selected seats",
            passengers.len(),
            seat_count
        ));
    }
    for (index, passenger) in passengers.iter().enumerate() {
        let ordinal = index + 1;
        if passenger.name.trim().is_empty() {
            return Err(format!("passenger {ordinal}: name is required"));
        }
        if passenger.gender.is_none() {
            return Err(format!("passenger {ordinal}: gender is required"));
        }
        match passenger.age {
            None => return Err(format!("passenger {ordinal}: age is required")),
            Some(age) if !AGE_RANGE.contains(&age) => {
                return Err(format!("passenger {ordinal}: age must be between 1 and 120"));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Minimal `local@domain.tld` shape check -- not RFC 5322, just enough
/// to catch obvious typos before the backend sees them.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactDetails {
        ContactDetails {
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
        }
    }

    fn passenger(seat: &str) -> PassengerDetail {
        PassengerDetail {
            seat_id: seat.into(),
            name: "Asha".into(),
            age: Some(29),
            gender: Some(Gender::Female),
        }
    }

    #[test]
    fn valid_details_pass() {
        assert_eq!(validate_details(&contact(), &[passenger("s1")], 1), Ok(()));
    }

    #[test]
    fn email_shape_is_enforced() {
        let bad = ContactDetails {
            email: "not-an-email".into(),
            phone: "9876543210".into(),
        };
        let err = validate_details(&bad, &[passenger("s1")], 1).unwrap_err();
        assert!(err.contains("email"));
    }

    #[test]
    fn email_requires_tld() {
        assert!(!is_plausible_email("asha@example"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("asha@.com"));
        assert!(is_plausible_email("asha@example.co.in"));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = validate_details(&contact(), &[passenger("s1")], 2).unwrap_err();
        assert!(err.contains("selected seats"));
    }

    #[test]
    fn missing_age_names_the_passenger() {
        let mut second = passenger("s2");
        second.age = None;
        let err = validate_details(&contact(), &[passenger("s1"), second], 2).unwrap_err();
        assert_eq!(err, "passenger 2: age is required");
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let mut p = passenger("s1");
        p.age = Some(0);
        assert!(validate_details(&contact(), &[p.clone()], 1).is_err());
        p.age = Some(121);
        assert!(validate_details(&contact(), &[p.clone()], 1).is_err());
        p.age = Some(1);
        assert!(validate_details(&contact(), &[p.clone()], 1).is_ok());
        p.age = Some(120);
        assert!(validate_details(&contact(), &[p], 1).is_ok());
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let mut p = passenger("s1");
        p.name = "   ".into();
        let err = validate_details(&contact(), &[p], 1).unwrap_err();
        assert_eq!(err, "passenger 1: name is required");
    }
}
