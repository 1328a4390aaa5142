// ============================================================================
// CSV EXPORT - Re-formateo del CSV del servidor a las columnas del resumen
// ============================================================================

use std::collections::HashMap;

use crate::services::error::{ApiError, FetchResult};

/// Registro indexado por nombre de cabecera
pub type CsvRecord = HashMap<String, String>;

/// Columnas de salida: (cabecera, cabeceras de entrada aceptadas, centinela)
const SUMMARY_COLUMNS: [(&str, &[&str], &str); 6] = [
    ("Assignee Name", &["Assignee Name", "Assigned Technician"], "Unassigned"),
    ("Ticket Name", &["Title"], "No Title"),
    ("Phase", &["Phase", "Status"], "Unknown"),
    ("Priority", &["Priority"], "Unknown"),
    ("Created At", &["Created At"], "N/A"),
    ("Resolved At", &["Resolved At"], "Not Resolved"),
];

/// Parsear CSV con fila de cabecera. Ignora líneas vacías; respeta comillas.
pub fn parse_csv(text: &str) -> FetchResult<Vec<CsvRecord>> {
    let mut rows = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let header_line = rows
        .next()
        .ok_or_else(|| ApiError::csv("CSV vacío: falta la fila de cabecera"))?;
    let headers: Vec<String> = split_row(header_line)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let records = rows
        .map(|line| {
            let values = split_row(line);
            headers
                .iter()
                .enumerate()
                .filter_map(|(i, header)| {
                    let value = values.get(i)?.trim();
                    (!value.is_empty()).then(|| (header.clone(), value.to_string()))
                })
                .collect()
        })
        .collect();

    Ok(records)
}

/// CSV del resumen. Todos los campos entre comillas.
pub fn render_summary(records: &[CsvRecord]) -> String {
    let header: Vec<&str> = SUMMARY_COLUMNS.iter().map(|(name, _, _)| *name).collect();
    let mut out = header.join(",");
    out.push('\n');

    for record in records {
        let fields: Vec<String> = SUMMARY_COLUMNS
            .iter()
            .map(|(_, sources, sentinel)| {
                let value = sources
                    .iter()
                    .find_map(|source| record.get(*source))
                    .map(String::as_str)
                    .unwrap_or(sentinel);
                quote(value)
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// parse + render
pub fn transform_export(raw: &str) -> FetchResult<String> {
    let records = parse_csv(raw)?;
    log::info!("📊 [CSV] {} registros parseados", records.len());
    Ok(render_summary(&records))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
