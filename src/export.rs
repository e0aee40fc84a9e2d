use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tempfile::Builder;
use tracing::info;

use crate::error::ExportError;
use crate::types::SourceAggregate;

pub const EXPORT_HEADERS: [&str; 3] = ["Alarm Source", "Total Downtime", "Availability (%)"];

/// Grava a planilha de resultado em `destination`.
///
/// Escreve num arquivo temporário exclusivo no mesmo diretório e renomeia ao
/// final, de modo que o destino nunca fica com conteúdo parcial, mesmo com
/// exportações concorrentes.
pub fn write_report(aggregates: &[SourceAggregate], destination: &Path) -> Result<(), ExportError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExportError::Io { path, source }
    };

    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err(parent))?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in (0u16..).zip(EXPORT_HEADERS) {
        sheet.write_string_with_format(0, col, header, &bold)?;
    }
    for (row, aggregate) in (1u32..).zip(aggregates) {
        sheet.write_string(row, 0, aggregate.alarm_source.as_str())?;
        sheet.write_string(row, 1, aggregate.formatted_downtime.as_str())?;
        sheet.write_number(row, 2, aggregate.availability_percent)?;
    }
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 32)?;
    sheet.set_column_width(2, 18)?;

    let staging = Builder::new()
        .prefix(".availability-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(io_err(parent))?;
    workbook.save(staging.path())?;
    staging
        .persist(destination)
        .map_err(|e| io_err(destination)(e.error))?;

    info!(
        "Planilha exportada em {} ({} origens)",
        destination.display(),
        aggregates.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};

    fn aggregate(source: &str, minutes: f64, downtime: &str, availability: f64) -> SourceAggregate {
        SourceAggregate {
            alarm_source: source.into(),
            total_duration_minutes: minutes,
            formatted_downtime: downtime.into(),
            availability_percent: availability,
        }
    }

    #[test]
    fn writes_expected_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("availability_results.xlsx");
        let rows = vec![
            aggregate("A", 45.0, "0 hours 45 minutes 0 seconds", 99.55),
            aggregate("B", 60.0, "1 hours 0 minutes 0 seconds", 99.4),
        ];

        write_report(&rows, &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let cells: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0][0], Data::String("Alarm Source".into()));
        assert_eq!(cells[0][2], Data::String("Availability (%)".into()));
        assert_eq!(cells[1][0], Data::String("A".into()));
        assert_eq!(cells[1][1], Data::String("0 hours 45 minutes 0 seconds".into()));
        assert_eq!(cells[2][2], Data::Float(99.4));
    }

    #[test]
    fn leaves_no_staging_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.xlsx");
        write_report(&[], &path).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("r.xlsx")]);
    }

    #[test]
    fn concurrent_exports_to_same_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("availability_results.xlsx");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let rows: Vec<SourceAggregate> = (0..200)
                        .map(|n| aggregate(&format!("S{i}-{n}"), 60.0, "1 hours 0 minutes 0 seconds", 99.4))
                        .collect();
                    write_report(&rows, &path)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.rows().count(), 201);

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("availability_results.xlsx")]);
    }
}
