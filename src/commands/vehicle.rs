//! Vehicle registry command handlers.

use crate::args::{AddVehicleArgs, DeleteVehicleArgs};
use crate::commands::{markdown_table, plural, Out};
use crate::error::{invalid, ErrorType, IntoResult};
use crate::model::{Transaction, Vehicle};
use crate::{Config, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::debug;

const FIRST_MODEL_YEAR: u16 = 1980;

/// What `delete_vehicle` removed.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleDeletion {
    /// Every row that carried the plate, usually one.
    pub vehicles: Vec<Vehicle>,
    pub transactions_removed: Vec<Transaction>,
}

/// Registers a new vehicle.
///
/// # Arguments
/// - `args.plate` is trimmed and uppercased. It may only hold letters, digits and `-`, and no other
///   vehicle may have the same plate.
/// - `args.year` defaults to the current year and must fall between 1980 and next year.
///
/// # Errors
/// - Returns a validation error, and writes nothing, if a required field is blank, the plate has
///   other characters or is already registered, or the year is out of range.
pub async fn add_vehicle(config: Config, args: AddVehicleArgs) -> Result<Out<Vehicle>> {
    let years = model_years();
    let vehicle = Vehicle {
        plate: args.plate,
        make: args.make,
        model: args.model,
        year: args.year.unwrap_or(*years.end() - 1),
        color: args.color.unwrap_or_default(),
    }
    .normalized();

    for (value, field) in [
        (&vehicle.plate, "plate"),
        (&vehicle.make, "make"),
        (&vehicle.model, "model"),
    ] {
        if value.is_empty() {
            return Err(invalid(format!("The vehicle {field} is required")));
        }
    }
    if let Some(c) = vehicle
        .plate
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(invalid(format!(
            "The plate '{}' may only hold letters, digits and '-', found '{c}'",
            vehicle.plate
        )));
    }
    if !years.contains(&vehicle.year) {
        return Err(invalid(format!(
            "The year {} is not between {} and {}",
            vehicle.year,
            years.start(),
            years.end()
        )));
    }

    let store = config.vehicles();
    let mut vehicles = store.load().await.pub_result(ErrorType::Store)?;
    if vehicles.iter().any(|v| v.plate == vehicle.plate) {
        return Err(invalid(format!(
            "A vehicle with plate '{}' is already registered",
            vehicle.plate
        )));
    }
    vehicles.push(vehicle.clone());
    store.save(&vehicles).await.pub_result(ErrorType::Store)?;
    debug!("Vehicle {vehicle} saved at row {}", vehicles.len() - 1);

    Ok(Out::new(format!("Vehicle {vehicle} saved"), vehicle))
}

/// Lists every vehicle in file order.
pub async fn list_vehicles(config: Config) -> Result<Out<Vec<Vehicle>>> {
    let vehicles = config.vehicles().load().await.pub_result(ErrorType::Store)?;
    if vehicles.is_empty() {
        return Ok(Out::new("No vehicles registered", vehicles));
    }

    let rows: Vec<Vec<String>> = vehicles
        .iter()
        .map(|v| {
            vec![
                v.plate.clone(),
                v.make.clone(),
                v.model.clone(),
                v.year.to_string(),
                v.color.clone(),
            ]
        })
        .collect();
    let table = markdown_table(&["Placa", "Marca", "Modelo", "Ano", "Cor"], &rows);
    let message = format!(
        "{}\n\n{table}",
        plural(vehicles.len(), "vehicle", "vehicles")
    );
    Ok(Out::new(message, vehicles))
}

/// Removes every vehicle row with the plate and every transaction recorded against it.
///
/// The vehicle store is rewritten before the transaction store. If the second write fails the
/// vehicle is gone while its transactions remain; they no longer show up anywhere but can be
/// removed with `ledger delete`.
///
/// # Errors
/// - Returns a validation error if no vehicle has the plate.
pub async fn delete_vehicle(
    config: Config,
    args: DeleteVehicleArgs,
) -> Result<Out<VehicleDeletion>> {
    let plate = Vehicle::normalize_plate(&args.plate);

    let vehicle_store = config.vehicles();
    let (removed, vehicles): (Vec<Vehicle>, Vec<Vehicle>) = vehicle_store
        .load()
        .await
        .pub_result(ErrorType::Store)?
        .into_iter()
        .partition(|v| v.plate == plate);
    let Some(vehicle) = removed.first() else {
        return Err(invalid(format!("No vehicle with plate '{plate}'")));
    };

    let transaction_store = config.transactions();
    let transactions = transaction_store
        .load()
        .await
        .pub_result(ErrorType::Store)?;
    let (transactions_removed, kept): (Vec<Transaction>, Vec<Transaction>) =
        transactions.into_iter().partition(|t| t.plate == plate);

    vehicle_store
        .save(&vehicles)
        .await
        .pub_result(ErrorType::Store)?;
    if !transactions_removed.is_empty() {
        transaction_store
            .save(&kept)
            .await
            .pub_result(ErrorType::Store)?;
    }
    debug!(
        "Removed {} and {} rows of {plate}",
        plural(removed.len(), "vehicle row", "vehicle rows"),
        transactions_removed.len()
    );

    let deleted = match removed.len() {
        1 => format!("vehicle {vehicle}"),
        n => format!("{n} vehicles with plate {plate}"),
    };
    let message = format!(
        "Deleted {deleted} and {}",
        plural(transactions_removed.len(), "transaction", "transactions")
    );
    Ok(Out::new(
        message,
        VehicleDeletion {
            vehicles: removed,
            transactions_removed,
        },
    ))
}

/// 1980 through next year.
fn model_years() -> RangeInclusive<u16> {
    let this_year = u16::try_from(Local::now().year()).unwrap_or(u16::MAX - 1);
    FIRST_MODEL_YEAR..=this_year + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PubError;
    use crate::model::Kind;
    use crate::test::TestEnv;

    fn args(plate: &str) -> AddVehicleArgs {
        AddVehicleArgs {
            plate: plate.to_string(),
            make: "Fiat".to_string(),
            model: "Mobi".to_string(),
            year: Some(2022),
            color: Some(" Branco ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_vehicle_normalizes_and_saves() {
        let env = TestEnv::new().await;

        let out = add_vehicle(env.config(), args(" abc1d23 ")).await.unwrap();

        let vehicle = out.structure().unwrap();
        assert_eq!(vehicle.plate, "ABC1D23");
        assert_eq!(vehicle.color, "Branco");
        assert_eq!(out.message(), "Vehicle ABC1D23 (Fiat Mobi) saved");
        assert_eq!(env.vehicles().await, vec![vehicle.clone()]);
    }

    #[tokio::test]
    async fn test_add_vehicle_defaults_to_this_year() {
        let env = TestEnv::new().await;
        let mut args = args("ABC1D23");
        args.year = None;

        let out = add_vehicle(env.config(), args).await.unwrap();

        let this_year = Local::now().year() as u16;
        assert_eq!(out.structure().unwrap().year, this_year);
    }

    #[tokio::test]
    async fn test_add_vehicle_rejects_duplicate_plate() {
        let env = TestEnv::new().await;
        env.insert_vehicle("ABC1D23").await;

        let err = add_vehicle(env.config(), args("abc1d23")).await.unwrap_err();

        assert!(err.to_string().contains("already registered"));
        assert_eq!(
            err.downcast_ref::<PubError>().unwrap().error_type(),
            ErrorType::Validation
        );
        assert_eq!(env.vehicles().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_vehicle_rejects_missing_fields_and_bad_years() {
        let env = TestEnv::new().await;

        let mut missing_model = args("ABC1D23");
        missing_model.model = "  ".to_string();
        let err = add_vehicle(env.config(), missing_model).await.unwrap_err();
        assert!(err.to_string().contains("model is required"));

        let mut too_old = args("ABC1D23");
        too_old.year = Some(1979);
        let err = add_vehicle(env.config(), too_old).await.unwrap_err();
        assert!(err.to_string().contains("not between 1980"));

        let mut too_new = args("ABC1D23");
        too_new.year = Some(Local::now().year() as u16 + 2);
        assert!(add_vehicle(env.config(), too_new).await.is_err());

        assert!(env.vehicles().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_vehicles() {
        let env = TestEnv::new().await;
        assert_eq!(
            list_vehicles(env.config()).await.unwrap().message(),
            "No vehicles registered"
        );

        env.insert_vehicle("ABC1D23").await;
        let out = list_vehicles(env.config()).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 1);
        assert!(out.message().starts_with("1 vehicle\n"));
        assert!(out.message().contains("| ABC1D23 | Fiat  | Mobi   | 2022 | Branco |"));
    }

    #[tokio::test]
    async fn test_delete_vehicle_cascades_to_transactions() {
        let env = TestEnv::new().await;
        env.insert_vehicle("ABC1D23").await;
        env.insert_vehicle("XYZ9W87").await;
        env.insert_transaction("ABC1D23", "2025-01-05", Kind::Income, "2.400,00")
            .await;
        env.insert_transaction("XYZ9W87", "2025-01-06", Kind::Income, "1.000,00")
            .await;
        env.insert_transaction("ABC1D23", "2025-01-20", Kind::Expense, "350,00")
            .await;

        let args = DeleteVehicleArgs {
            plate: "abc1d23".to_string(),
        };
        let out = delete_vehicle(env.config(), args).await.unwrap();

        let deletion = out.structure().unwrap();
        assert_eq!(deletion.vehicles.len(), 1);
        assert_eq!(deletion.vehicles[0].plate, "ABC1D23");
        assert_eq!(deletion.transactions_removed.len(), 2);
        assert_eq!(
            out.message(),
            "Deleted vehicle ABC1D23 (Fiat Mobi) and 2 transactions"
        );

        let vehicles = env.vehicles().await;
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].plate, "XYZ9W87");
        let transactions = env.transactions().await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].plate, "XYZ9W87");
    }

    #[tokio::test]
    async fn test_delete_vehicle_removes_every_row_of_the_plate() {
        let env = TestEnv::new().await;
        env.insert_vehicle("ABC1D23").await;
        env.insert_vehicle("XYZ9W87").await;
        env.insert_vehicle("ABC1D23").await;
        env.insert_transaction("ABC1D23", "2025-01-05", Kind::Income, "2.400,00")
            .await;

        let args = DeleteVehicleArgs {
            plate: "ABC1D23".to_string(),
        };
        let out = delete_vehicle(env.config(), args).await.unwrap();

        assert_eq!(out.structure().unwrap().vehicles.len(), 2);
        assert_eq!(
            out.message(),
            "Deleted 2 vehicles with plate ABC1D23 and 1 transaction"
        );
        let plates: Vec<String> = env.vehicles().await.into_iter().map(|v| v.plate).collect();
        assert_eq!(plates, vec!["XYZ9W87"]);
        assert!(env.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_vehicle_rejects_path_characters_in_plate() {
        let env = TestEnv::new().await;

        for plate in ["../ABC1D23", "ABC/1D23", "ABC 1D23"] {
            let err = add_vehicle(env.config(), args(plate)).await.unwrap_err();
            assert!(err.to_string().contains("may only hold letters, digits and '-'"));
        }
        assert!(add_vehicle(env.config(), args("ABC-1234")).await.is_ok());
        assert_eq!(env.vehicles().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_vehicle() {
        let env = TestEnv::new().await;
        env.insert_vehicle("ABC1D23").await;
        env.insert_transaction("ZZZ0Z00", "2025-01-05", Kind::Income, "10,00")
            .await;

        let args = DeleteVehicleArgs {
            plate: "ZZZ0Z00".to_string(),
        };
        let err = delete_vehicle(env.config(), args).await.unwrap_err();

        assert!(err.to_string().contains("No vehicle with plate 'ZZZ0Z00'"));
        assert_eq!(env.vehicles().await.len(), 1);
        assert_eq!(env.transactions().await.len(), 1);
    }
}
