use super::{br_date, Invoice};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; font-size: 12px; color: #000; background-color: #fff; }
.container { max-width: 800px; margin: auto; border: 1px solid #000; padding: 40px; background-color: #fff; }
.header { display: flex; justify-content: space-between; align-items: flex-start; border-bottom: 2px solid #000; padding-bottom: 10px; }
.logo-empresa-container { flex: 2; display: flex; align-items: center; }
.logo { max-height: 70px; width: auto; margin-right: 15px; }
.empresa-info p { margin: 3px 0; }
.fatura-box { flex: 1; border: 1px solid #000; padding: 5px; text-align: center; }
.fatura-box h2 { margin: 0; font-size: 14px; }
.fatura-box p { margin: 2px 0; }
.sacado-box { border: 1px solid #000; padding: 10px; margin-top: 10px; }
.sacado-box p { margin: 3px 0; }
.vencimento-box { border: 1px solid #000; padding: 5px; margin-top: 10px; display: flex; justify-content: space-between; }
.vencimento-box div { width: 50%; }
.extenso-box { border: 1px solid #000; padding: 5px; margin-top: 10px; }
.descricao-table { width: 100%; border-collapse: collapse; margin-top: 10px; }
.descricao-table th, .descricao-table td { border: 1px solid #000; padding: 5px; }
.descricao-table th { text-align: center; }
.descricao-table .valor-col { text-align: right; width: 120px; }
.descricao-table .total-label { text-align: right; font-weight: bold; border-left: none; border-bottom: none; }
.footer { text-align: center; margin-top: 15px; font-size: 10px; }
strong { font-weight: bold; }
@media print {
  @page { size: A4; margin: 20mm; }
  body { margin: 0; padding: 0; -webkit-print-color-adjust: exact; print-color-adjust: exact; }
  .container { border: none; box-shadow: none; width: 100%; max-width: 100%; margin: 0; padding: 0; }
}";

/// Renders the invoice into the fixed HTML layout.
pub(crate) fn invoice_html(invoice: &Invoice<'_>) -> Markup {
    let company = invoice.company;
    let client = invoice.client;
    let number = invoice.number;
    let amount = invoice.amount.brl();

    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Fatura de Locação N° " (number) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="container" {
                    div class="header" {
                        div class="logo-empresa-container" {
                            @if let Some(png) = invoice.logo_png {
                                img src=(format!("data:image/png;base64,{}", STANDARD.encode(png))) class="logo";
                            }
                            div class="empresa-info" {
                                strong { (company.name) }
                                p { (company.address) }
                                p { "CNPJ: " (company.cnpj) }
                                p { "FONE: " (company.phone) }
                            }
                        }
                        div class="fatura-box" {
                            h2 { "FATURA DE LOCAÇÃO" }
                            p { strong { "N°:" } " " (number) }
                            p { strong { "Data da Emissão:" } " " (br_date(invoice.issue_date)) }
                        }
                    }
                    div class="sacado-box" {
                        p { strong { "Sacado:" } " " (client.name) }
                        p { strong { "Endereço:" } " " (client.address) }
                        p {
                            strong { "Município:" } " " (client.municipality) " "
                            strong { "UF:" } " " (client.state) " "
                            strong { "CEP:" } " " (client.postal_code)
                        }
                        p { strong { "CNPJ(MF)/CPF:" } " " (client.tax_id) }
                    }
                    div class="vencimento-box" {
                        div { strong { "Fatura/Duplicata Valor R$:" } " " (amount) }
                        div { strong { "Vencimento(s):" } " " (br_date(invoice.due_date)) }
                    }
                    div class="extenso-box" {
                        strong { "Valor por Extenso:" } " " (invoice.amount_in_words)
                    }
                    table class="descricao-table" {
                        thead { tr { th { "Descrição" } th { "Valor R$" } } }
                        tbody {
                            tr {
                                td {
                                    "Contrato: " (invoice.contract)
                                    " Período: " (br_date(invoice.period_start))
                                    " a " (br_date(invoice.period_end))
                                    br;
                                    "Placa Atual: " (invoice.vehicle.plate)
                                    br;
                                    "Itens/Despesas e Serviços Adicionais:"
                                    br;
                                    (invoice.item_description) " - R$ " (amount)
                                }
                                td class="valor-col" { (amount) }
                            }
                            tr {
                                td class="total-label" { "Total da Fatura" }
                                td class="valor-col" { strong { "R$ " (amount) } }
                            }
                        }
                    }
                    div class="footer" { p { (company.footer) } }
                }
            }
        }
    }
}
