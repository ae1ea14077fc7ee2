//! Client registry command handlers.

use crate::args::{AddClientArgs, DeleteClientArgs};
use crate::commands::{markdown_table, plural, Out};
use crate::error::{invalid, ErrorType, IntoResult};
use crate::model::Client;
use crate::{Config, Result};
use tracing::debug;

/// Registers a new client.
///
/// The tax ID and phone are punctuated (see `model::format`) and the state is uppercased before
/// the row is appended to `clientes.csv`. Names are not required to be unique.
///
/// # Errors
/// - Returns a validation error, and writes nothing, if the name or the tax ID is blank.
pub async fn add_client(config: Config, args: AddClientArgs) -> Result<Out<Client>> {
    ensure_filled(&args.name, "name")?;
    ensure_filled(&args.tax_id, "CPF/CNPJ")?;

    let client = Client {
        name: args.name,
        tax_id: args.tax_id,
        address: args.address.unwrap_or_default(),
        municipality: args.municipality.unwrap_or_default(),
        state: args.state.unwrap_or_default(),
        postal_code: args.postal_code.unwrap_or_default(),
        phone: args.phone.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
    }
    .normalized();

    let row = config
        .clients()
        .append(client.clone())
        .await
        .pub_result(ErrorType::Store)?;
    debug!("Client '{}' saved at row {row}", client.name);

    Ok(Out::new(
        format!("Client '{}' ({}) saved", client.name, client.tax_id),
        client,
    ))
}

/// Lists every client in file order.
pub async fn list_clients(config: Config) -> Result<Out<Vec<Client>>> {
    let clients = config.clients().load().await.pub_result(ErrorType::Store)?;
    if clients.is_empty() {
        return Ok(Out::new("No clients registered", clients));
    }

    let rows: Vec<Vec<String>> = clients
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.tax_id.clone(),
                c.municipality.clone(),
                c.state.clone(),
                c.phone.clone(),
                c.email.clone(),
            ]
        })
        .collect();
    let table = markdown_table(
        &["Nome", "CPF/CNPJ", "Município", "UF", "Telefone", "Email"],
        &rows,
    );
    let message = format!("{}\n\n{table}", plural(clients.len(), "client", "clients"));
    Ok(Out::new(message, clients))
}

/// Removes every client whose name matches `args.name` exactly and returns the removed rows.
///
/// # Errors
/// - Returns a validation error if no client has that name.
pub async fn delete_clients(config: Config, args: DeleteClientArgs) -> Result<Out<Vec<Client>>> {
    let store = config.clients();
    let clients = store.load().await.pub_result(ErrorType::Store)?;

    let name = args.name.trim();
    let (removed, kept): (Vec<Client>, Vec<Client>) =
        clients.into_iter().partition(|c| c.name == name);
    if removed.is_empty() {
        return Err(invalid(format!("No client named '{name}'")));
    }

    store.save(&kept).await.pub_result(ErrorType::Store)?;
    let message = format!(
        "Deleted {} named '{name}'",
        plural(removed.len(), "client", "clients")
    );
    Ok(Out::new(message, removed))
}

fn ensure_filled(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("The client {field} is required")));
    }
    Ok(())
}
