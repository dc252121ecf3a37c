// Interactive text menu over a loaded holiday repository

use std::io::{self, BufRead, Write};

use crate::fetcher::HolidayFetcher;
use crate::holiday::HolidayRecord;
use crate::repository::{DayMonth, HolidayRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowByYear,
    SearchByDate,
    SearchByName,
    ShowAll,
    Exit,
}

impl MenuAction {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(MenuAction::ShowByYear),
            "2" => Some(MenuAction::SearchByDate),
            "3" => Some(MenuAction::SearchByName),
            "4" => Some(MenuAction::ShowAll),
            "5" => Some(MenuAction::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// "dd.mm.yyyy - localName (name)"
pub fn format_holiday(record: &HolidayRecord) -> String {
    format!(
        "{} - {} ({})",
        record.date.format("%d.%m.%Y"),
        record.local_name,
        record.name
    )
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

// "2023-2025" for a contiguous sorted run, otherwise "2023, 2025"
pub fn years_label(years: &[i32]) -> String {
    match (years.first(), years.last()) {
        (Some(&first), Some(&last))
            if years.len() > 1
                && i64::from(last) - i64::from(first) == years.len() as i64 - 1 =>
        {
            format!("{first}-{last}")
        }
        _ => years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

pub struct Menu<'r, F, R, W> {
    repo: &'r HolidayRepository<F>,
    input: R,
    output: W,
    years_label: String,
}

impl<'r, F, R, W> Menu<'r, F, R, W>
where
    F: HolidayFetcher,
    R: BufRead,
    W: Write,
{
    pub fn new(repo: &'r HolidayRepository<F>, input: R, output: W) -> Self {
        Self {
            repo,
            input,
            output,
            years_label: years_label(repo.years()),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks exit or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;

            let Some(choice) = self.read_line()? else {
                return Ok(());
            };
            writeln!(self.output)?;

            let flow = match MenuAction::from_choice(&choice) {
                Some(MenuAction::ShowByYear) => self.show_by_year()?,
                Some(MenuAction::SearchByDate) => self.search_by_date()?,
                Some(MenuAction::SearchByName) => self.search_by_name()?,
                Some(MenuAction::ShowAll) => self.show_all()?,
                Some(MenuAction::Exit) => {
                    writeln!(self.output, "Exiting...")?;
                    Flow::Exit
                }
                None => {
                    writeln!(
                        self.output,
                        "Invalid choice, please enter a number between 1 and 5."
                    )?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(());
            }
            writeln!(self.output)?;
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "===== Public Holiday Tracker =====")?;
        writeln!(self.output, "1. Show holidays for a year")?;
        writeln!(self.output, "2. Search holidays by date (dd-mm)")?;
        writeln!(self.output, "3. Search holidays by name")?;
        writeln!(self.output, "4. Show all holidays ({})", self.years_label)?;
        writeln!(self.output, "5. Exit")?;
        write!(self.output, "Your choice: ")?;
        self.output.flush()
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    // None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show_by_year(&mut self) -> io::Result<Flow> {
        let years = self
            .repo
            .years()
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let Some(text) = self.prompt(&format!("Enter a year ({years}): "))? else {
            return Ok(Flow::Exit);
        };

        let year = match text.trim().parse::<i32>() {
            Ok(year) if self.repo.years().contains(&year) => year,
            _ => {
                writeln!(self.output, "Invalid year: '{}'.", text.trim())?;
                return Ok(Flow::Continue);
            }
        };

        let repo = self.repo;
        match repo.query_by_year(year) {
            None => writeln!(self.output, "No holiday data found for {year}.")?,
            Some(records) => {
                writeln!(self.output, "=== {year} public holidays ===")?;
                for record in records {
                    writeln!(
                        self.output,
                        "{} | Global: {}",
                        format_holiday(record),
                        yes_no(record.is_global)
                    )?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn search_by_date(&mut self) -> io::Result<Flow> {
        let Some(text) = self.prompt("Enter a date (dd-mm, e.g. 01-01): ")? else {
            return Ok(Flow::Exit);
        };

        let when = match text.parse::<DayMonth>() {
            Ok(when) => when,
            Err(e) => {
                writeln!(self.output, "{e}. Example: 01-01")?;
                return Ok(Flow::Continue);
            }
        };

        let repo = self.repo;
        let matches = repo.find_on(when);
        writeln!(self.output, "=== Holidays on {:02}-{:02} ===", when.day, when.month)?;
        if matches.is_empty() {
            writeln!(
                self.output,
                "No public holiday on this date in {}.",
                self.years_label
            )?;
        }
        for m in matches {
            writeln!(self.output, "{}", format_holiday(m.record))?;
        }
        Ok(Flow::Continue)
    }

    fn search_by_name(&mut self) -> io::Result<Flow> {
        let Some(text) = self.prompt("Enter part of a holiday name (local or English): ")? else {
            return Ok(Flow::Exit);
        };

        let repo = self.repo;
        let matches = match repo.query_by_name(&text) {
            Ok(matches) => matches,
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        writeln!(self.output, "=== Holidays matching '{}' ===", text.trim())?;
        if matches.is_empty() {
            writeln!(self.output, "No holiday matches that name.")?;
        }
        for m in matches {
            writeln!(self.output, "{} - Year: {}", format_holiday(m.record), m.year)?;
        }
        Ok(Flow::Continue)
    }

    fn show_all(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "=== All public holidays {} ===", self.years_label)?;

        let repo = self.repo;
        for section in repo.all_records().sections {
            writeln!(self.output, "--- {} ---", section.year)?;
            if !section.has_data() {
                writeln!(self.output, "No data.")?;
                continue;
            }
            for record in section.records {
                writeln!(self.output, "{}", format_holiday(record))?;
            }
        }
        Ok(Flow::Continue)
    }
}
