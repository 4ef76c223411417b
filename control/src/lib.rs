//! Run-control parameters of the XC layer, read from an `in.ctrl`-style file.
//!
//! The file holds one `key = value` pair per line. Blank lines and lines
//! starting with `#` are skipped; anything after a `#` on a line is ignored.

use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_XC_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("cannot read control file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected 'key = value', found '{text}'")]
    Syntax { line: usize, text: String },

    #[error("line {line}: unknown parameter '{key}'")]
    UnknownParameter { line: usize, key: String },

    #[error("line {line}: invalid value '{value}' for '{key}'")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Control {
    verbosity: String,
    spin_scheme: String, // nonspin, spin
    xc_device: bool,
    xc_chunk_size: usize,
}

impl Default for Control {
    fn default() -> Self {
        Control {
            verbosity: "high".to_string(),
            spin_scheme: "nonspin".to_string(),
            xc_device: false,
            xc_chunk_size: DEFAULT_XC_CHUNK_SIZE,
        }
    }
}

impl Control {
    pub fn new() -> Control {
        Control::default()
    }

    pub fn get_verbosity(&self) -> &str {
        &self.verbosity
    }

    pub fn get_spin_scheme(&self) -> &str {
        &self.spin_scheme
    }

    pub fn is_spin(&self) -> bool {
        "spin" == self.get_spin_scheme()
    }

    pub fn get_xc_device(&self) -> bool {
        self.xc_device
    }

    pub fn get_xc_chunk_size(&self) -> usize {
        self.xc_chunk_size
    }

    pub fn read_file(&mut self, inpfile: &str) -> Result<(), ControlError> {
        let lines = read_file_data_to_vec(inpfile)?;

        debug!(file = inpfile, nlines = lines.len(), "read control file");

        self.parse_lines(lines.iter().map(String::as_str))
    }

    pub fn parse(&mut self, text: &str) -> Result<(), ControlError> {
        self.parse_lines(text.lines())
    }

    fn parse_lines<'a>(&mut self, lines: impl Iterator<Item = &'a str>) -> Result<(), ControlError> {
        let mut seen: Vec<String> = Vec::new();

        for (iline, raw) in lines.enumerate() {
            let line = iline + 1;

            let text = raw.split('#').next().unwrap_or("").trim();

            if text.is_empty() {
                continue;
            }

            let s: Vec<&str> = text.split('=').map(|x| x.trim()).collect();

            if s.len() != 2 || s[0].is_empty() || s[1].is_empty() {
                return Err(ControlError::Syntax {
                    line,
                    text: raw.to_string(),
                });
            }

            let (key, value) = (s[0], s[1]);

            if seen.iter().any(|k| k == key) {
                warn!(line, key, "parameter given more than once, the last value is used");
            } else {
                seen.push(key.to_string());
            }

            let invalid = || ControlError::InvalidValue {
                line,
                key: key.to_string(),
                value: value.to_string(),
            };

            match key {
                "verbosity" => {
                    self.verbosity = value.to_string();
                }

                "spin_scheme" => match value {
                    "nonspin" | "spin" => self.spin_scheme = value.to_string(),
                    _ => return Err(invalid()),
                },

                "xc_device" => {
                    self.xc_device = value.parse().map_err(|_| invalid())?;
                }

                "xc_chunk_size" => {
                    let n: usize = value.parse().map_err(|_| invalid())?;

                    if n == 0 {
                        return Err(invalid());
                    }

                    self.xc_chunk_size = n;
                }

                _ => {
                    return Err(ControlError::UnknownParameter {
                        line,
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 28;
        const OUT_WIDTH2: usize = 18;

        println!("   {:-^80}", " control parameters ");
        println!();

        println!(
            "   {:<width1$} = {:>width2$}",
            "verbosity",
            self.get_verbosity(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$}",
            "spin_scheme",
            self.get_spin_scheme(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$}",
            "xc_device",
            self.get_xc_device(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$}",
            "xc_chunk_size",
            self.get_xc_chunk_size(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!();
    }
}

fn read_file_data_to_vec(inpfile: &str) -> Result<Vec<String>, ControlError> {
    let file = File::open(inpfile).map_err(|source| ControlError::Io {
        path: inpfile.to_string(),
        source,
    })?;

    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .map_err(|source| ControlError::Io {
            path: inpfile.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests;
