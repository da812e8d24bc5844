use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::ExtractError;
use crate::model::{PlantRecord, PlantRow, PlantTable};

fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    table: &PlantTable,
) -> Result<(), ExtractError> {
    writer.write_record(PlantTable::HEADERS)?;
    for record in table {
        writer.serialize(PlantRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `table` with the fixed `planta,exposicao,...` header row.
pub fn write_table(path: &Path, table: &PlantTable, delimiter: u8) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_path(path)?;
    write_rows(&mut writer, table)
}

pub fn write_table_to_string(table: &PlantTable, delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::<u8>::new());
    write_rows(&mut writer, table)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

/// Loads a table previously written by [`write_table`], keeping file order.
pub fn read_table(path: &Path, delimiter: u8) -> Result<PlantTable, ExtractError> {
    let file = std::fs::File::open(path)?;
    read_table_from_reader(file, delimiter)
}

pub fn read_table_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<PlantTable, ExtractError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::None)
        .from_reader(reader);
    let records = reader
        .deserialize::<PlantRow>()
        .map(|row| row.map(PlantRecord::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PlantTable::from_records(records))
}
