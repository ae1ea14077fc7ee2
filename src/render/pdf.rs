use super::{br_date, Invoice};
use crate::Result;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use std::io::BufWriter;

const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;
const AMOUNT_X: f32 = 165.0;

/// Lays the invoice out on a single A4 page. The logo is not drawn.
pub(crate) fn invoice_pdf(invoice: &Invoice<'_>) -> Result<Vec<u8>> {
    let title = format!("Fatura de Locação N° {}", invoice.number);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("Unable to load the regular font: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("Unable to load the bold font: {e}"))?;

    let company = invoice.company;
    let client = invoice.client;
    let amount = invoice.amount.brl();

    // Letterhead (left) and invoice box (right)
    let mut y: f32 = 282.0;
    text(&layer, &bold, &company.name, 13.0, LEFT, y);
    text(&layer, &bold, "FATURA DE LOCAÇÃO", 12.0, 140.0, y);
    y -= 6.0;
    text(&layer, &font, &company.address, 9.0, LEFT, y);
    text(&layer, &font, &format!("N°: {}", invoice.number), 10.0, 140.0, y);
    y -= 5.0;
    text(&layer, &font, &format!("CNPJ: {}", company.cnpj), 9.0, LEFT, y);
    text(
        &layer,
        &font,
        &format!("Data da Emissão: {}", br_date(invoice.issue_date)),
        10.0,
        140.0,
        y,
    );
    y -= 5.0;
    text(&layer, &font, &format!("FONE: {}", company.phone), 9.0, LEFT, y);
    y -= 4.0;
    rule(&layer, y);

    // Client
    y -= 8.0;
    text(&layer, &bold, "Sacado:", 10.0, LEFT, y);
    text(&layer, &font, &client.name, 10.0, LEFT + 17.0, y);
    y -= 5.5;
    text(&layer, &font, &format!("Endereço: {}", client.address), 10.0, LEFT, y);
    y -= 5.5;
    text(
        &layer,
        &font,
        &format!(
            "Município: {}   UF: {}   CEP: {}",
            client.municipality, client.state, client.postal_code
        ),
        10.0,
        LEFT,
        y,
    );
    y -= 5.5;
    text(&layer, &font, &format!("CNPJ(MF)/CPF: {}", client.tax_id), 10.0, LEFT, y);
    y -= 4.0;
    rule(&layer, y);

    // Amount, due date and amount in words
    y -= 7.0;
    text(&layer, &bold, &format!("Fatura/Duplicata Valor R$: {amount}"), 10.0, LEFT, y);
    text(
        &layer,
        &bold,
        &format!("Vencimento(s): {}", br_date(invoice.due_date)),
        10.0,
        110.0,
        y,
    );
    y -= 6.0;
    text(
        &layer,
        &font,
        &format!("Valor por Extenso: {}", invoice.amount_in_words),
        10.0,
        LEFT,
        y,
    );
    y -= 4.0;
    rule(&layer, y);

    // Description table
    y -= 7.0;
    text(&layer, &bold, "Descrição", 10.0, LEFT, y);
    text(&layer, &bold, "Valor R$", 10.0, AMOUNT_X, y);
    y -= 3.0;
    rule(&layer, y);
    y -= 6.0;
    text(
        &layer,
        &font,
        &format!(
            "Contrato: {} Período: {} a {}",
            invoice.contract,
            br_date(invoice.period_start),
            br_date(invoice.period_end)
        ),
        10.0,
        LEFT,
        y,
    );
    text(&layer, &font, &amount, 10.0, AMOUNT_X, y);
    y -= 5.0;
    text(
        &layer,
        &font,
        &format!("Placa Atual: {}", invoice.vehicle.plate),
        10.0,
        LEFT,
        y,
    );
    y -= 5.0;
    text(&layer, &font, "Itens/Despesas e Serviços Adicionais:", 10.0, LEFT, y);
    y -= 5.0;
    text(
        &layer,
        &font,
        &format!("{} - R$ {amount}", invoice.item_description),
        10.0,
        LEFT,
        y,
    );
    y -= 4.0;
    rule(&layer, y);
    y -= 7.0;
    text(&layer, &bold, "Total da Fatura", 11.0, 120.0, y);
    text(&layer, &bold, &format!("R$ {amount}"), 11.0, AMOUNT_X, y);

    // Footer
    text(&layer, &font, &company.footer, 8.0, LEFT, 15.0);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| anyhow::anyhow!("Unable to write the PDF document: {e}"))?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush the PDF document: {e}"))
}

fn text(layer: &PdfLayerReference, font: &IndirectFontRef, s: &str, size: f32, x: f32, y: f32) {
    layer.use_text(s, size, Mm(x), Mm(y), font);
}

/// A horizontal line across the printable width.
fn rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(LEFT), Mm(y)), false),
            (Point::new(Mm(RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support;

    #[test]
    fn test_invoice_pdf_is_a_pdf() {
        let bytes = invoice_pdf(&test_support::invoice()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }

    /// Built-in font text is written as a hex string of WinAnsi bytes, which match Latin-1 for
    /// every character on the invoice.
    fn pdf_text(s: &str) -> String {
        s.chars().map(|c| format!("{:02X}", u32::from(c))).collect()
    }

    #[test]
    fn test_invoice_pdf_content() {
        let bytes = invoice_pdf(&test_support::invoice()).unwrap();
        let content = String::from_utf8_lossy(&bytes).to_uppercase();

        for expected in [
            "FATURA DE LOCAÇÃO",
            "N°: 42",
            "Maria & Filhos Transportes",
            "Placa Atual: ABC1D23",
            "Contrato: 3/12",
            "R$ 2.400,00",
            "Data da Emissão: 01/03/2025",
        ] {
            assert!(
                content.contains(&pdf_text(expected)),
                "{expected} is missing from the PDF"
            );
        }
        assert_eq!(pdf_text("FATURA DE LOCAÇÃO"), "464154555241204445204C4F4341C7C34F");
    }
}
