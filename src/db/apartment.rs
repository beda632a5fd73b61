use diesel::{
    pg::Pg,
    prelude::*,
    result::Error,
    sql_types::{Nullable, Text},
};
use log::info;

use super::schema::apartment::{self, dsl::*};
use crate::models::apartment::{Apartment, ApartmentKey, InsertableApartment, NormalizedApartment};

diesel::sql_function!(fn lower(x: Nullable<Text>) -> Nullable<Text>);

pub fn insert(conn: &mut PgConnection, normalized: &NormalizedApartment) -> Result<Apartment, Error> {
    let stored: Apartment = diesel::insert_into(apartment::table)
        .values(InsertableApartment::from(normalized))
        .returning(Apartment::as_returning())
        .get_result(conn)?;

    info!("Inserted apartment {} into apartment table", stored.id);
    Ok(stored)
}

pub fn get_all(conn: &mut PgConnection) -> Result<Vec<Apartment>, Error> {
    apartment::table
        .select(Apartment::as_select())
        .load(conn)
}

/// Filters on the `(lower(address), apartment_number)` index.
pub fn by_key(key: &ApartmentKey) -> apartment::BoxedQuery<'_, Pg> {
    apartment::table
        .filter(lower(address).eq(key.address.as_str()))
        .filter(apartment_number.eq(key.apartment_number.as_str()))
        .into_boxed()
}

pub fn find_by_key(conn: &mut PgConnection, key: &ApartmentKey) -> Result<Option<Apartment>, Error> {
    by_key(key)
        .select(Apartment::as_select())
        .first(conn)
        .optional()
}
