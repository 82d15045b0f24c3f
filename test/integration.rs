// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{at, Eraser, Quitter, SnipFixture, Typist, Untouched};

use anyhow::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use snip::{editor::EditorError, snippet::SnippetError, RecordError, SnipConfig};

#[test]
fn record_day_of_snippets() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let settings = fixture.settings(SnipConfig::default())?;

    fixture.record(&settings, at((2024, 11, 20), (9, 30)), Some("at desk"), false, &Untouched)?;
    fixture.record(
        &settings,
        at((2024, 11, 20), (9, 53)),
        Some("reviewed"),
        true,
        &Typist(" the quarterly\nnumbers"),
    )?;
    fixture.record(&settings, at((2024, 11, 20), (17, 2)), None, false, &Typist("home"))?;

    let expect = indoc! {"
        --- Wednesday Nov 20 2024 in Europe/Dublin ---
        09:30 | at desk
        09:53 | reviewed the quarterly numbers
        17:02 | home
    "};
    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))).as_deref(), Some(expect));

    Ok(())
}

#[test]
fn record_splits_snippets_by_date() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let settings = fixture.settings(SnipConfig::default())?;

    fixture.record(&settings, at((2024, 11, 20), (23, 59)), Some("late"), false, &Untouched)?;
    fixture.record(&settings, at((2024, 11, 21), (0, 1)), Some("early"), false, &Untouched)?;

    let expect = indoc! {"
        --- Wednesday Nov 20 2024 in Europe/Dublin ---
        23:59 | late
    "};
    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))).as_deref(), Some(expect));

    let expect = indoc! {"
        --- Thursday Nov 21 2024 in Europe/Dublin ---
        00:01 | early
    "};
    assert_eq!(fixture.day_file(at((2024, 11, 21), (0, 0))).as_deref(), Some(expect));

    Ok(())
}

#[test]
fn record_header_survives_disabled_header() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let with_header = fixture.settings(SnipConfig::default())?;
    let without_header = fixture.settings(SnipConfig {
        include_header: Some(false),
        ..Default::default()
    })?;

    fixture.record(&with_header, at((2024, 11, 20), (9, 30)), Some("at desk"), false, &Untouched)?;
    fixture.record(&without_header, at((2024, 11, 20), (9, 53)), Some("reviewed"), false, &Untouched)?;
    fixture.record(&with_header, at((2024, 11, 20), (10, 15)), Some("standup"), false, &Untouched)?;

    let expect = indoc! {"
        --- Wednesday Nov 20 2024 in Europe/Dublin ---
        09:30 | at desk
        09:53 | reviewed
        10:15 | standup
    "};
    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))).as_deref(), Some(expect));

    Ok(())
}

#[test]
fn record_without_header_from_config_file() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let path = fixture.write_config(indoc! {r#"
        time_format = "%H:%M:%S"
        include_header = false
    "#})?;
    let settings = fixture.settings(SnipConfig::load(path)?)?;

    fixture.record(&settings, at((2024, 11, 20), (9, 30)), Some("at desk"), false, &Untouched)?;

    assert_eq!(
        fixture.day_file(at((2024, 11, 20), (0, 0))).as_deref(),
        Some("09:30:00 | at desk\n")
    );

    Ok(())
}

#[test]
fn record_aborts_on_erased_snippet() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let settings = fixture.settings(SnipConfig::default())?;

    let result = fixture.record(&settings, at((2024, 11, 20), (9, 30)), None, false, &Eraser);
    let error = result.expect_err("erased snippet must not be recorded");
    assert!(matches!(
        error.downcast_ref::<RecordError>(),
        Some(RecordError::Editor(EditorError::Snippet(SnippetError::Empty)))
    ));

    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))), None);
    assert!(!fixture.store().root().exists());

    Ok(())
}

#[test]
fn record_aborts_on_editor_failure() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let settings = fixture.settings(SnipConfig::default())?;

    fixture.record(&settings, at((2024, 11, 20), (9, 30)), Some("at desk"), false, &Untouched)?;
    let before = fixture.day_file(at((2024, 11, 20), (0, 0)));

    let result = fixture.record(&settings, at((2024, 11, 20), (9, 53)), None, false, &Quitter);
    assert!(result.is_err());
    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))), before);

    Ok(())
}

#[test]
fn record_opens_composer_for_empty_message() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let settings = fixture.settings(SnipConfig::default())?;

    fixture.record(&settings, at((2024, 11, 20), (9, 30)), Some(""), false, &Typist("at desk"))?;

    let expect = indoc! {"
        --- Wednesday Nov 20 2024 in Europe/Dublin ---
        09:30 | at desk
    "};
    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))).as_deref(), Some(expect));

    Ok(())
}

#[test]
fn record_skips_composer_for_message_without_edit() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let settings = fixture.settings(SnipConfig::default())?;

    fixture.record(&settings, at((2024, 11, 20), (9, 30)), Some("at desk"), false, &Untouched)?;

    let result = fixture.record(&settings, at((2024, 11, 20), (9, 53)), Some("x"), true, &Untouched);
    assert!(matches!(
        result.map_err(|error| error.downcast::<RecordError>()),
        Err(Ok(RecordError::Editor(EditorError::Spawn { .. })))
    ));

    let expect = indoc! {"
        --- Wednesday Nov 20 2024 in Europe/Dublin ---
        09:30 | at desk
    "};
    assert_eq!(fixture.day_file(at((2024, 11, 20), (0, 0))).as_deref(), Some(expect));

    Ok(())
}

#[test]
fn record_rejects_invalid_time_format() -> Result<()> {
    let fixture = SnipFixture::new()?;
    let result = fixture.settings(SnipConfig {
        time_format: Some(String::new()),
        ..Default::default()
    });
    assert!(result.is_err());

    Ok(())
}
