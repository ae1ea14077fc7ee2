use crate::model::format::{format_phone, format_tax_id};
use crate::store::Record;
use serde::{Deserialize, Serialize};

/// Represents a single row of `clientes.csv`.
///
/// Clients are addressed by name, which is not required to be unique.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "Nome")]
    pub name: String,
    /// CPF or CNPJ.
    #[serde(rename = "CPF/CNPJ")]
    pub tax_id: String,
    #[serde(rename = "Endereço")]
    pub address: String,
    #[serde(rename = "Município")]
    pub municipality: String,
    /// Two letter state abbreviation (UF).
    #[serde(rename = "UF")]
    pub state: String,
    /// CEP.
    #[serde(rename = "CEP")]
    pub postal_code: String,
    #[serde(rename = "Telefone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
}

impl Client {
    /// Trims every field, punctuates the tax ID and phone, and uppercases the state.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            tax_id: format_tax_id(self.tax_id.trim()),
            address: self.address.trim().to_string(),
            municipality: self.municipality.trim().to_string(),
            state: self.state.trim().to_uppercase(),
            postal_code: self.postal_code.trim().to_string(),
            phone: format_phone(self.phone.trim()),
            email: self.email.trim().to_string(),
        }
    }
}

impl Record for Client {
    const HEADERS: &'static [&'static str] = &[
        "Nome",
        "CPF/CNPJ",
        "Endereço",
        "Município",
        "UF",
        "CEP",
        "Telefone",
        "Email",
    ];
}

#[test]
fn test_client_normalized() {
    let client = Client {
        name: "  Maria Souza ".to_string(),
        tax_id: "12345678901".to_string(),
        state: "mg".to_string(),
        phone: "35 99981 7121".to_string(),
        postal_code: "37900-114".to_string(),
        ..Default::default()
    }
    .normalized();
    assert_eq!(client.name, "Maria Souza");
    assert_eq!(client.tax_id, "123.456.789-01");
    assert_eq!(client.state, "MG");
    assert_eq!(client.phone, "(35) 99981-7121");
    assert_eq!(client.postal_code, "37900-114");
}
