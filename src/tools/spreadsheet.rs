use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

use super::errors::{ScoutError, ScoutResult};
use crate::api_models::Entity;

const NAME_COLUMN: usize = 0;
const ADDRESS_COLUMN: usize = 2;
const MIN_COLUMNS: usize = 3;

/// Load every entity from the first sheet of `path`.
///
/// The first row is a header. `.csv` files are read with the same layout,
/// everything else goes through calamine.
pub fn read_entities(path: &Path) -> ScoutResult<Vec<Entity>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        read_csv_entities(path)
    } else {
        read_workbook_entities(path)
    }
}

fn read_workbook_entities(path: &Path) -> ScoutResult<Vec<Entity>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ScoutError::spreadsheet(path.to_path_buf(), e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ScoutError::spreadsheet(path.to_path_buf(), "workbook has no sheets"))?
        .map_err(|e| ScoutError::spreadsheet(path.to_path_buf(), e))?;

    entities_from_range(&range)
}

/// Rows and columns are absolute sheet positions: calamine trims leading
/// blank rows and columns from a range, so a blank column A still counts as
/// the name column and the header is always sheet row 1.
fn entities_from_range(range: &Range<Data>) -> ScoutResult<Vec<Entity>> {
    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return Ok(Vec::new());
    };

    let mut entities = Vec::new();
    for row in start_row.max(1)..=end_row {
        let cells: Vec<Data> = (0..=end_col)
            .map(|col| {
                if col < start_col {
                    return Data::Empty;
                }
                range
                    .get(((row - start_row) as usize, (col - start_col) as usize))
                    .cloned()
                    .unwrap_or(Data::Empty)
            })
            .collect();
        entities.push(entity_from_cells(row as usize + 1, &cells)?);
    }
    Ok(entities)
}

fn read_csv_entities(path: &Path) -> ScoutResult<Vec<Entity>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ScoutError::spreadsheet(path.to_path_buf(), e))?;

    let mut entities = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ScoutError::spreadsheet(path.to_path_buf(), e))?;
        // Header is row 1.
        let row = index + 2;
        if record.len() < MIN_COLUMNS {
            return Err(column_count_error(row, record.len()));
        }
        entities.push(Entity::new(
            record[NAME_COLUMN].trim(),
            record[ADDRESS_COLUMN].trim(),
        ));
    }
    Ok(entities)
}

fn entity_from_cells(row: usize, cells: &[Data]) -> ScoutResult<Entity> {
    if cells.len() < MIN_COLUMNS {
        return Err(column_count_error(row, cells.len()));
    }
    let name = text_cell(row, "account name", &cells[NAME_COLUMN])?;
    let address = text_cell(row, "address", &cells[ADDRESS_COLUMN])?;
    Ok(Entity::new(name, address))
}

fn column_count_error(row: usize, found: usize) -> ScoutError {
    ScoutError::schema(
        row,
        format!("expected at least {} columns, found {}", MIN_COLUMNS, found),
    )
}

/// Text or empty cells only; a blank cell reads as `""`.
fn text_cell(row: usize, column: &str, cell: &Data) -> ScoutResult<String> {
    match cell {
        Data::String(value) => Ok(value.trim().to_string()),
        Data::Empty => Ok(String::new()),
        other => Err(ScoutError::schema(
            row,
            format!("{} must be text, found {:?}", column, other),
        )),
    }
}
