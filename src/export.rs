use polars::prelude::*;

use crate::aggregate::epoch_date;
use crate::error::ProfileError;

const SEPARATOR: char = '|';

/// Render a report table as delimited text for download: pipe-separated
/// values with a comma as the decimal separator, one header line, one line
/// per row.
pub fn to_delimited(df: &DataFrame) -> Result<String, ProfileError> {
    let mut out = String::new();

    let names = df.get_column_names_str();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(name);
    }
    out.push('\n');

    let columns = df.get_columns();
    for row in 0..df.height() {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            let value = column.get(row)?;
            out.push_str(&format_value(&value));
        }
        out.push('\n');
    }
    Ok(out)
}

fn format_value(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(f) => format!("{f}").replace('.', ","),
        AnyValue::Float32(f) => format!("{f}").replace('.', ","),
        AnyValue::Date(d) => epoch_date(*d).format("%Y-%m-%d").to_string(),
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn formats_header_rows_and_decimal_commas() {
        let report = df!(
            "SKU_ID" => ["S1", "S2"],
            "OLs" => [2i64, 1],
            "SKU_%" => [33.33f64, 100.0],
        )
        .unwrap();
        let text = to_delimited(&report).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "SKU_ID|OLs|SKU_%");
        assert_eq!(lines[1], "S1|2|33,33");
        assert_eq!(lines[2], "S2|1|100");
    }

    #[test]
    fn round_trips_through_matching_separators() {
        let report = df!(
            "SKU_ID" => ["S1", "S2", "S3"],
            "OLs" => [5i64, 3, 1],
            "OLs_%" => [55.56f64, 88.89, 100.0],
        )
        .unwrap();
        let text = to_delimited(&report).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len() - 1, report.height());
        for (row, line) in lines[1..].iter().enumerate() {
            let fields: Vec<&str> = line.split('|').collect();
            let sku = report
                .column("SKU_ID")
                .unwrap()
                .as_materialized_series()
                .str()
                .unwrap()
                .get(row)
                .unwrap();
            assert_eq!(fields[0], sku);

            let ols: i64 = fields[1].parse().unwrap();
            assert_eq!(
                ols,
                report.column("OLs").unwrap().as_materialized_series().i64().unwrap().get(row).unwrap()
            );

            let per: f64 = fields[2].replace(',', ".").parse().unwrap();
            let expected = report
                .column("OLs_%")
                .unwrap()
                .as_materialized_series()
                .f64()
                .unwrap()
                .get(row)
                .unwrap();
            assert!((per - expected).abs() < 0.01);
        }
    }

    #[test]
    fn nulls_render_as_empty_fields() {
        let report = df!(
            "SKU_ID" => ["S1"],
        )
        .unwrap();
        let mut report = report;
        report
            .with_column(Series::new("maybe".into(), &[None::<f64>]))
            .unwrap();
        let text = to_delimited(&report).unwrap();
        assert_eq!(text.lines().nth(1).unwrap(), "S1|");
    }
}
