use std::time::Instant;

use ansi_term::Colour;
use webdeps::{BuildError, InstallOutput, StatusReporter};

pub struct ConsoleReporter {
  pub silent: bool,
  pub start: Instant,
}

impl StatusReporter for ConsoleReporter {
  fn on_start(&self, total: usize) {
    if !self.silent {
      println!("{} {total} packages", Colour::White.dimmed().paint("Installing"));
    }
  }

  fn on_progress(&self, message: &str) {
    if !self.silent {
      println!("{}", Colour::White.dimmed().paint(message));
    }
  }

  fn on_warning(&self, warning: &anyhow::Error) {
    if !self.silent {
      println!("{} {warning:#}", Colour::Yellow.paint("Warning:"));
    }
  }

  fn on_success(&self, output: &InstallOutput) {
    if self.silent {
      return;
    }
    print_output_chunks(output);
    let elapsed = format!("{:.2} ms", self.start.elapsed().as_secs_f64() * 1000.0);
    println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
  }

  fn on_error(&self, error: &BuildError) {
    for error in &**error {
      eprintln!("{} {error:#}", Colour::Red.paint("Error:"));
    }
  }
}

fn print_output_chunks(output: &InstallOutput) {
  let dest = output.dest.file_name().map_or_else(|| output.dest.to_string_lossy(), |name| name.to_string_lossy());
  let rows = output
    .chunks
    .iter()
    .map(|chunk| {
      let kind = if chunk.is_entry { "entry" } else { "chunk" };
      (chunk.filename.as_str(), kind, format!("{:.2}", chunk.code.len() as f64 / 1024.0))
    })
    .collect::<Vec<_>>();
  let left = rows.iter().map(|(filename, ..)| filename.len()).max().unwrap_or_default();
  let right = rows.iter().map(|(.., size)| size.len()).max().unwrap_or_default();

  let dim = Colour::White.dimmed();
  for (filename, kind, size) in rows {
    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint(format!("{dest}/")),
      Colour::Cyan.paint(filename),
      "",
      dim.paint(kind),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename.len(),
      right = right - size.len()
    );
  }
}
