mod common;

use std::process::Command;

use plant_guide_csv::csv_out::read_table;
use plant_guide_csv::model::{FieldLabel, PageText};
use plant_guide_csv::{ExtractOptions, WarningCode, convert_to_csv, extract_table};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const HEADER: &str = "planta,exposicao,rega,ambiente,poda,adubo";

const COVER: &str = "Nature Farm Presentation\nGuia de Plantas\n\nFestival de Flores para\nVendedores e Colaboradores\n";

const ORQUIDEA: &str = "Guia de Plantas\n4\nOrquídea\nExposição ao Sol: Luz indireta,\nsem sol direto.\n\nRega: Uma vez por semana.\n\nAmbiente: Interno\nPoda: Retirar hastes secas\nAdubo: NPK 20-20-20 quinzenal.\n";

fn pages(texts: &[&str]) -> Vec<PageText> {
    texts
        .iter()
        .zip(1_u32..)
        .map(|(text, page_number)| PageText {
            page_number,
            text: (*text).to_string(),
        })
        .collect()
}

#[test]
fn two_page_guide_yields_single_row() {
    let (table, report) =
        extract_table(&pages(&[COVER, ORQUIDEA]), &ExtractOptions::default()).expect("extract");

    assert_eq!(table.len(), 1);
    let record = &table.records()[0];
    assert_eq!(record.name, "Orquídea");
    assert_eq!(
        record.field(FieldLabel::Exposicao),
        "Luz indireta, sem sol direto"
    );
    assert_eq!(record.field(FieldLabel::Rega), "Uma vez por semana");
    assert_eq!(record.field(FieldLabel::Ambiente), "Interno");
    assert_eq!(record.field(FieldLabel::Poda), "Retirar hastes secas");
    assert_eq!(record.field(FieldLabel::Adubo), "NPK 20-20-20 quinzenal");
    assert_eq!(report.page_count, 2);
    assert_eq!(report.record_count, 1);
}

#[test]
fn incomplete_entries_are_skipped_with_a_warning() {
    let only_one = "Rosa\nExposição ao Sol:\nRega:\nAmbiente: Jardim\nPoda:\nAdubo:";
    let two = "Rosa\nExposição ao Sol: Sol pleno\nRega: Diária\nAmbiente:\nPoda:\nAdubo:";

    let (rejected, report) =
        extract_table(&pages(&[only_one]), &ExtractOptions::default()).expect("extract");
    assert!(rejected.is_empty());
    assert_eq!(report.warnings[0].code, WarningCode::IncompleteEntry);

    let (accepted, _) = extract_table(&pages(&[two]), &ExtractOptions::default()).expect("extract");
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted.records()[0].field(FieldLabel::Rega), "Diária");
}

#[test]
fn duplicates_merge_by_completeness_in_page_order() {
    let first = "Kalanchoe\nExposição ao Sol: Sol\nRega: Pouca";
    let better = "Kalanchoe\nExposição ao Sol: Sol pleno\nRega: Pouca\nAmbiente: Externo\nAdubo: Mensal";
    let tie = "kalanchoe\nExposição ao Sol: Sombra\nRega: Muita\nAmbiente: Interno\nPoda: Sim";

    let (table, _) =
        extract_table(&pages(&[first, better, tie]), &ExtractOptions::default()).expect("extract");
    assert_eq!(table.len(), 1);
    let record = &table.records()[0];
    assert_eq!(record.field(FieldLabel::Exposicao), "Sol pleno");
    assert_eq!(record.field(FieldLabel::Adubo), "Mensal");
    assert_eq!(record.field(FieldLabel::Poda), "");
}

#[test]
fn converts_text_dump_to_csv_file() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("guia.txt");
    let output = dir.path().join("plantas.csv");
    let babosa = "Babosa\nExposição ao Sol: Sol pleno\nRega: Rara, \"quando secar\"\nAmbiente: Externo";
    common::write_text_dump(&input, &[COVER, ORQUIDEA, babosa]).expect("fixture written");

    let report = convert_to_csv(&input, &output, &ExtractOptions::default()).expect("convert");
    assert_eq!(report.record_count, 2);

    let csv = std::fs::read_to_string(&output).expect("CSV should be readable");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(HEADER));
    assert_eq!(
        lines.next(),
        Some("Babosa,Sol pleno,\"Rara, \"\"quando secar\"\"\",Externo,,")
    );
    assert!(
        lines.next().is_some_and(|line| line.starts_with("Orquídea,")),
        "unexpected CSV output: {csv:?}"
    );

    let loaded = read_table(&output, b',').expect("table loads back");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.records()[0].field(FieldLabel::Rega), "Rara, \"quando secar\"");
}

#[test]
fn honours_page_selection_and_extra_boilerplate() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("guia.txt");
    let output = dir.path().join("plantas.csv");
    let with_banner = "Edição Primavera\nLavanda\nExposição ao Sol: Sol pleno\nRega: Pouca";
    common::write_text_dump(&input, &[ORQUIDEA, with_banner]).expect("fixture written");

    let options = ExtractOptions {
        pages: Some("2".parse().expect("selection should parse")),
        extra_boilerplate: vec!["Edição Primavera".to_string()],
        ..ExtractOptions::default()
    };
    let report = convert_to_csv(&input, &output, &options).expect("convert");
    assert_eq!(report.page_count, 1);

    let table = read_table(&output, b',').expect("table loads back");
    let names = table.iter().map(|record| record.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Lavanda"]);
}

#[test]
fn cli_prints_usage_without_two_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_plant2csv"))
        .arg("only-input.txt")
        .output()
        .expect("CLI should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn cli_reports_output_path_and_count() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("guia.txt");
    let output = dir.path().join("plantas.csv");
    common::write_text_dump(&input, &[COVER, ORQUIDEA]).expect("fixture written");

    let result = Command::new(env!("CARGO_BIN_EXE_plant2csv"))
        .args([input.as_os_str(), output.as_os_str()])
        .output()
        .expect("CLI should run");

    assert_eq!(result.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains(&*output.to_string_lossy()), "stdout: {stdout}");
    assert!(stdout.contains("1 records"), "stdout: {stdout}");
}

#[test]
fn cli_fails_on_missing_input() {
    let dir = tempdir().expect("tempdir should be created");
    let status = Command::new(env!("CARGO_BIN_EXE_plant2csv"))
        .args([
            dir.path().join("missing.txt").as_os_str(),
            dir.path().join("out.csv").as_os_str(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(1));
}

#[test]
fn search_cli_finds_accent_insensitive_matches() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("guia.txt");
    let table = dir.path().join("plantas.csv");
    common::write_text_dump(&input, &[ORQUIDEA]).expect("fixture written");
    convert_to_csv(&input, &table, &ExtractOptions::default()).expect("convert");

    let result = Command::new(env!("CARGO_BIN_EXE_plant-search"))
        .arg(table.as_os_str())
        .arg("ORQUIDEA")
        .arg("--json")
        .output()
        .expect("CLI should run");

    assert_eq!(result.status.code(), Some(0));
    let rows: serde_json::Value =
        serde_json::from_slice(&result.stdout).expect("stdout should be JSON");
    assert_eq!(rows[0]["planta"], "Orquídea");
    assert_eq!(rows[0]["ambiente"], "Interno");
}
