// SPDX-License-Identifier: AGPL-3.0-or-later
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn convert_acm2_to_python_via_cli() {
    let mut cmd = cargo_bin_cmd!("dirtree");
    cmd.write_stdin("acm2 python\n3\nroot 1\na 2\nb 3\n-1\n1\n2\n");

    cmd.assert()
        .success()
        .stdout("3\nroot 1\n    a 2\n        b 3\n");
}

#[test]
fn convert_python_to_xml_via_cli() {
    let mut cmd = cargo_bin_cmd!("dirtree");
    cmd.write_stdin("python xml\n2\nroot 1\n    leaf 2\n");

    cmd.assert().success().stdout(
        predicate::str::contains("<dir name='root' id='1'>")
            .and(predicate::str::contains("  <file name='leaf' id='2'/>"))
            .and(predicate::str::ends_with("</dir>\n")),
    );
}

#[test]
fn unknown_format_fails_without_output() {
    let mut cmd = cargo_bin_cmd!("dirtree");
    cmd.write_stdin("yaml acm1\n1\nr 1\n");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown format tag 'yaml'"));
}

#[test]
fn malformed_input_reports_format_and_line() {
    let mut cmd = cargo_bin_cmd!("dirtree");
    cmd.write_stdin("acm1 acm3\n2\nr 1\na two\n");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("acm1 parse error at line 4"));
}
