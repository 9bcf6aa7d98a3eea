use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use timbre_core::models::config::ScanConfig;
use timbre_core::{
    list_documents, walk_documents, DocumentProcessor, Exporter, InvalidDocument, Reconciler,
    TargetSet,
};

fn stamped(uuid: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4" xmlns:tfd="http://www.sat.gob.mx/TimbreFiscalDigital" Version="4.0" Total="116.00">
  <cfdi:Emisor Rfc="EKU9003173C9" Nombre="ESCUELA KEMPER URGATE"/>
  <cfdi:Receptor Rfc="URE180429TM6" Nombre="UNIVERSIDAD ROBOTICA ESPAÑOLA"/>
  <cfdi:Complemento>
    <tfd:TimbreFiscalDigital Version="1.1" UUID="{uuid}" FechaTimbrado="2024-03-01T12:00:00"/>
  </cfdi:Complemento>
</cfdi:Comprobante>
"#
    )
}

fn payroll(uuid: &str) -> String {
    format!(
        r#"<cfdi:Comprobante Version="3.3">
  <cfdi:Complemento>
    <nomina12:Nomina Version="1.2" TipoNomina="O"/>
  </cfdi:Complemento>
  <cfdi:Complemento>
    <tfd:TimbreFiscalDigital Version="1.1" UUID="{uuid}"/>
  </cfdi:Complemento>
</cfdi:Comprobante>
"#
    )
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn reconcile(input: &Path, targets: TargetSet, output: &Path) -> timbre_core::ReconcileReport {
    let options = ScanConfig::default();
    Reconciler::new(DocumentProcessor::new(), targets, output)
        .unwrap()
        .run(walk_documents(input, &options))
        .unwrap()
}

fn dir_listing(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let path = e.unwrap().path();
            (
                path.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read(&path).unwrap(),
            )
        })
        .collect();
    entries.sort();
    entries
}

#[test]
fn reconcile_copies_matches_and_reports_unmatched() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(&input.path().join("enero/a.xml"), &stamped("A1"));
    write(&input.path().join("febrero/c.xml"), &payroll("C3"));
    write(&input.path().join("roto.xml"), "<cfdi:Comprobante><cfdi:Emisor>");

    let targets: TargetSet = ["A1", "B2"].into_iter().collect();
    let report = reconcile(input.path(), targets, output.path());

    let names: Vec<String> = dir_listing(output.path()).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["A1.xml".to_string()]);
    assert_eq!(
        fs::read_to_string(output.path().join("A1.xml")).unwrap(),
        stamped("A1")
    );

    assert_eq!(report.scanned, 3);
    assert_eq!(report.unmatched, vec!["B2".to_string()]);
    assert_eq!(report.diagnostics.len(), 1);
    let skip = &report.diagnostics.skipped()[0];
    assert_eq!(skip.path, input.path().join("roto.xml"));
    assert!(matches!(skip.reason, InvalidDocument::Malformed(_)));
}

#[test]
fn reconcile_runs_are_reproducible() {
    let input = tempfile::tempdir().unwrap();
    write(&input.path().join("x/1.xml"), &stamped("A1"));
    write(&input.path().join("x/2.xml"), &payroll("A1"));
    write(&input.path().join("y/3.xml"), &payroll("B2"));
    write(&input.path().join("z.xml"), "<rss/>");

    let list = input.path().join("uuids.csv");
    fs::write(&list, "A1\nB2\nZ9\n").unwrap();

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let targets = TargetSet::from_csv_path(&list, false).unwrap();
    reconcile(input.path(), targets, first.path());
    let targets = TargetSet::from_csv_path(&list, false).unwrap();
    reconcile(input.path(), targets, second.path());

    assert_eq!(dir_listing(first.path()), dir_listing(second.path()));
    assert_eq!(dir_listing(first.path()).len(), 2);
}

#[test]
fn reconcile_never_opens_other_extensions() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    // Would be a skip event if it were ever opened.
    write(&input.path().join("deep/er/notes.txt"), "not xml");
    write(&input.path().join("deep/er/copy.XML"), &stamped("A1"));
    write(&input.path().join("deep/er/real.xml"), &stamped("B2"));

    let targets: TargetSet = ["A1", "B2"].into_iter().collect();
    let report = reconcile(input.path(), targets, output.path());

    assert_eq!(report.scanned, 1);
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.unmatched, vec!["A1".to_string()]);
}

#[test]
fn export_writes_one_row_per_document() {
    let input = tempfile::tempdir().unwrap();
    write(&input.path().join("1.xml"), &stamped("U1"));
    write(&input.path().join("2.xml"), &payroll("U2"));
    write(&input.path().join("3.xml"), &stamped("U3"));
    write(&input.path().join("sub/4.xml"), &stamped("U4"));
    write(&input.path().join("5.txt"), &stamped("U5"));

    let result = input.path().join("uuids.csv");
    let files = list_documents(input.path(), "xml").unwrap();
    let exporter = Exporter::create(DocumentProcessor::new(), &result).unwrap();
    let (report, _) = exporter.run(files.clone()).unwrap();

    assert_eq!(report.records, 3);
    let rows: Vec<String> = fs::read_to_string(&result)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    let expected: Vec<String> = files
        .iter()
        .zip(["U1", "U2", "U3"])
        .map(|(path, uuid): (&PathBuf, &str)| format!("{},{}", uuid, path.display()))
        .collect();
    assert_eq!(rows, expected);
}
