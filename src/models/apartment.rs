use diesel::prelude::*;
use serde::{Serialize, Serializer};

use crate::db::schema::apartment;

/// Canonical shape of one scraped listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedApartment {
    pub address: String,
    pub apartment_number: Option<String>,
    pub price: Option<i64>,
    pub no_fee: bool,
    pub listing_company: Option<String>,
    pub days_on_market: Option<String>,
    #[serde(serialize_with = "empty_when_missing")]
    pub popularity: Option<i64>,
    pub description: String,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub sq_ft: Option<String>,
}

// Popularity is written as "" rather than null or 0 when the page had none
fn empty_when_missing<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) if *n != 0 => serializer.serialize_i64(*n),
        _ => serializer.serialize_str(""),
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = apartment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Apartment {
    pub id: i32,
    pub address: Option<String>,
    pub apartment_number: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub square_feet: Option<String>,
    pub description: Option<String>,
    pub listing_company: Option<String>,
    pub no_fee: Option<bool>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = apartment)]
pub struct InsertableApartment {
    pub address: Option<String>,
    pub apartment_number: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub square_feet: Option<String>,
    pub description: Option<String>,
    pub listing_company: Option<String>,
    pub no_fee: Option<bool>,
}

impl From<&NormalizedApartment> for InsertableApartment {
    fn from(value: &NormalizedApartment) -> Self {
        InsertableApartment {
            address: Some(value.address.clone()),
            apartment_number: value.apartment_number.clone(),
            bedrooms: value.bedrooms.clone(),
            bathrooms: value.bathrooms.clone(),
            square_feet: value.sq_ft.clone(),
            description: Some(value.description.clone()),
            listing_company: value.listing_company.clone(),
            no_fee: Some(value.no_fee),
        }
    }
}

/// Lookup key taken from `/apartments/:address/:apartmentNumber`.
///
/// The address arrives slugified (`123-main-st`) and is compared
/// case-insensitively; the unit must match exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentKey {
    pub address: String,
    pub apartment_number: String,
}

impl ApartmentKey {
    pub fn from_path(address_slug: &str, apartment_number: &str) -> ApartmentKey {
        ApartmentKey {
            address: address_slug.replace('-', " ").to_lowercase(),
            apartment_number: apartment_number.to_string(),
        }
    }
}
