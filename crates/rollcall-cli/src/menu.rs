//! Interactive menu loop.
//!
//! Reads numeric choices from the operator and dispatches to the five
//! actions. Generic over the input/output streams so the loop can be
//! driven by scripted input in tests. EOF or a non-numeric choice ends
//! the loop; an out-of-range integer redisplays the menu.

use anyhow::Result;
use rollcall_pipeline::{read_result, Gateway, GatewayError};
use rollcall_store::{resolve_name, RecordStore};
use std::io::{BufRead, Write};

use crate::config::Config;

pub fn run<R: BufRead, W: Write>(
    cfg: &Config,
    store: &RecordStore,
    gateway: &Gateway,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        write!(
            out,
            "\n===== Rollcall Menu =====\n\
             1) Add student\n\
             2) Recognize & mark attendance\n\
             3) Show students\n\
             4) Show attendance\n\
             5) Exit\n\
             Choose: "
        )?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            break;
        };
        let Ok(choice) = line.trim().parse::<i32>() else {
            break;
        };

        match choice {
            1 => add_student(cfg, gateway, input, out)?,
            2 => recognize(cfg, store, gateway, out)?,
            3 => show_students(store, out)?,
            4 => show_attendance(store, out)?,
            5 => {
                writeln!(out, "Exiting...")?;
                break;
            }
            _ => writeln!(out, "Invalid choice.")?,
        }
    }
    Ok(())
}

/// Prompt for identity data, run the enroll tool, then unconditionally
/// rebuild the encoding database so the new samples are matchable at once.
fn add_student<R: BufRead, W: Write>(
    cfg: &Config,
    gateway: &Gateway,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let Some(id) = prompt(input, out, "Enter ID: ")? else {
        return Ok(());
    };
    let Some(name) = prompt(input, out, "Enter Name: ")? else {
        return Ok(());
    };
    let id = id.trim();
    let name = name.trim();
    if id.is_empty() || name.is_empty() {
        writeln!(out, "[WARN] ID and name are required.")?;
        return Ok(());
    }

    let label = format!("Samples (default {}): ", cfg.default_samples);
    let Some(samples_raw) = prompt(input, out, &label)? else {
        return Ok(());
    };
    let samples_raw = samples_raw.trim();
    let samples = if samples_raw.is_empty() {
        cfg.default_samples
    } else {
        match samples_raw.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                writeln!(out, "[WARN] Sample count must be a number.")?;
                return Ok(());
            }
        }
    };

    if let Err(e) = gateway.run_enroll(id, name, samples) {
        warn_tool(out, &e)?;
        return Ok(());
    }

    writeln!(out, "[AUTO] Encoding database...")?;
    if let Err(e) = gateway.run_encode(&cfg.dataset_dir, &cfg.encodings_path) {
        warn_tool(out, &e)?;
    }
    Ok(())
}

/// Re-encode, run the recognizer, then resolve the recognized id against
/// the roster and append one attendance record. Any failure along the way
/// warns and leaves the attendance log untouched.
fn recognize<W: Write>(
    cfg: &Config,
    store: &RecordStore,
    gateway: &Gateway,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "[AUTO] Encoding latest dataset...")?;
    if let Err(e) = gateway.run_encode(&cfg.dataset_dir, &cfg.encodings_path) {
        warn_tool(out, &e)?;
        return Ok(());
    }
    if let Err(e) = gateway.run_recognize(&cfg.encodings_path, cfg.threshold) {
        warn_tool(out, &e)?;
        return Ok(());
    }

    let result = match read_result(&cfg.result_path) {
        Ok(Some(result)) => result,
        Ok(None) => {
            writeln!(out, "[WARN] No recognition result.")?;
            return Ok(());
        }
        Err(e) => {
            tracing::warn!(error = %e, "unusable recognition result");
            writeln!(out, "[WARN] {e}")?;
            return Ok(());
        }
    };
    let Some(id) = result.id else {
        writeln!(out, "[WARN] No valid ID in result.")?;
        return Ok(());
    };

    let students = store.load_students()?;
    let name = resolve_name(&students, &id).to_string();
    store.append_attendance(&id, &name)?;
    writeln!(out, "[SUCCESS] Attendance marked for {name}")?;
    Ok(())
}

fn show_students<W: Write>(store: &RecordStore, out: &mut W) -> Result<()> {
    let students = store.load_students()?;
    writeln!(out, "\n--- Students ---")?;
    for s in &students {
        writeln!(out, "{} | {}", s.id, s.name)?;
    }
    Ok(())
}

fn show_attendance<W: Write>(store: &RecordStore, out: &mut W) -> Result<()> {
    writeln!(out, "\n--- Attendance Records ---")?;
    for line in store.attendance_lines()? {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn warn_tool<W: Write>(out: &mut W, err: &GatewayError) -> Result<()> {
    tracing::warn!(error = %err, "external tool failed");
    writeln!(out, "[WARN] {err}")?;
    Ok(())
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    read_line(input)
}

/// One line of operator input, without the terminator. `None` on EOF.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
}
