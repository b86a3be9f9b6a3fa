use assert_cmd::Command;
use sgen::AnyEmptyResult;

#[test]
fn check_passes_on_a_clean_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(
		&input,
		"@property(fog)\nuniform vec4 fogParams;\n@end\nvoid main() {}\n",
	)?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("check")
		.arg(&input)
		.assert()
		.success()
		.stdout(predicates::str::contains("expands cleanly"));

	Ok(())
}

#[test]
fn check_fails_on_a_duplicate_piece() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	let pieces = tmp.path().join("pieces.any");
	std::fs::write(&input, "@insertpiece(p)\n")?;
	std::fs::write(&pieces, "@piece(p)a@end\n@piece(p)b@end\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("check")
		.arg(&input)
		.arg("--piece")
		.arg(&pieces)
		.assert()
		.failure()
		.stderr(predicates::str::contains("already defined"));

	Ok(())
}

#[test]
fn check_reports_the_offending_line() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(&input, "void main() {}\n\n@foreach(i, 0, 4)\nx\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("check")
		.arg(&input)
		.assert()
		.failure()
		.stderr(predicates::str::contains("line 3"));

	Ok(())
}

#[test]
fn check_on_a_missing_file_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("check")
		.arg(tmp.path().join("nope.any"))
		.assert()
		.failure();

	Ok(())
}
