//! Line-oriented interactive pairing session.
//!
//! One registry row is selected at a time. `options` lists the survey rows
//! it may claim, `pick` claims one, `clear` releases it. Saving and
//! exporting snapshot the session; a failed save or export is reported and
//! the session is kept.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use recon_map::{ProposeOutcome, SuggestionParams};
use recon_model::PairingStatus;
use recon_persistence::HistoryStore;
use recon_report::{ExportFormat, ExportOptions};
use tracing::{debug, info};

use crate::render::{
    options_table, partition_table, registry_rows_table, status_line, suggestions_table,
    summary_table,
};
use crate::workbench::Workbench;

/// Settings shared by every command of a session.
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub export: ExportOptions,
    pub suggestions: SuggestionParams,
    /// History database; `save` is unavailable without it.
    pub store: Option<HistoryStore>,
    pub project: Option<String>,
    pub operator: String,
    pub out_dir: PathBuf,
    pub base_name: String,
}

/// Which registry rows `rows` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsView {
    All,
    Pending,
    Paired,
}

/// `pick #3` names a listed position; any other text is a survey key, so
/// numeric keys such as `0012` stay pickable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// 1-based position in the last `options` or `suggest` listing.
    Index(usize),
    Key(String),
}

impl FromStr for PickTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("usage: pick <#number|survey key>".to_string());
        }
        match s.strip_prefix('#') {
            Some(position) => match position.trim().parse::<usize>() {
                Ok(index) if index > 0 => Ok(Self::Index(index)),
                _ => Err(format!("invalid option number '{s}', options start at #1")),
            },
            None => Ok(Self::Key(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Rows(RowsView),
    Select(String),
    Next,
    Options,
    /// Filter for the selected row's options; empty clears it.
    Filter(String),
    /// Filter applied to every row's options; empty clears it.
    Global(String),
    Pick(PickTarget),
    Clear,
    Suggest,
    Status,
    Save,
    Export(Vec<ExportFormat>),
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        let command = match word.to_lowercase().as_str() {
            "rows" | "ls" => match rest.to_lowercase().as_str() {
                "" | "all" => Self::Rows(RowsView::All),
                "pending" => Self::Rows(RowsView::Pending),
                "paired" => Self::Rows(RowsView::Paired),
                other => return Err(format!("unknown rows view '{other}' (all, pending, paired)")),
            },
            "select" | "sel" => {
                if rest.is_empty() {
                    return Err("usage: select <registry id>".to_string());
                }
                Self::Select(rest.to_string())
            }
            "next" | "n" => Self::Next,
            "options" | "o" => Self::Options,
            "filter" | "f" => Self::Filter(rest.to_string()),
            "global" | "g" => Self::Global(rest.to_string()),
            "pick" | "p" => Self::Pick(rest.parse()?),
            "clear" => Self::Clear,
            "suggest" | "s" => Self::Suggest,
            "status" => Self::Status,
            "save" => Self::Save,
            "export" => {
                let formats = if rest.is_empty() {
                    vec![ExportFormat::Xlsx]
                } else if rest.eq_ignore_ascii_case("all") {
                    ExportFormat::ALL.to_vec()
                } else {
                    rest.split([',', ' '])
                        .filter(|part| !part.is_empty())
                        .map(ExportFormat::from_str)
                        .collect::<Result<Vec<_>, _>>()?
                };
                Self::Export(formats)
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}', type 'help'")),
        };
        Ok(command)
    }
}

const HELP: &str = "\
commands:
  rows [all|pending|paired]   list registry rows
  select <id>                 work on one registry row
  next                        select the next pending row
  options                     list survey rows the selected row may claim
  filter [text]               filter the options (empty clears)
  global [text]               filter options of every row (empty clears)
  pick <#n|key>               claim listed option n, or a survey key
  clear                       release the selected row's claim
  suggest                     rank unclaimed survey rows for the selected row
  status                      pairing counts
  save                        append the session to the project history
  export [xlsx|csv|zip|all]   write the reconciliation files
  quit                        leave (asks again when there are unsaved changes)";

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a> {
    bench: &'a mut Workbench,
    ctx: &'a ShellContext,
    current: Option<String>,
    text_filter: String,
    global_filter: String,
    /// Survey keys of the last `options` or `suggest` listing.
    listed: Vec<String>,
    dirty: bool,
    quit_requested: bool,
}

impl fmt::Debug for Shell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("current", &self.current)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<'a> Shell<'a> {
    /// Start on the first pending registry row.
    pub fn new(bench: &'a mut Workbench, ctx: &'a ShellContext) -> Self {
        let current = bench
            .next_pending(None)
            .map(|record| record.registry_id.clone());
        Self {
            bench,
            ctx,
            current,
            text_filter: String::new(),
            global_filter: String::new(),
            listed: Vec::new(),
            dirty: false,
            quit_requested: false,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// True when claims changed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", status_line(&self.bench.summary()))?;
        self.prompt(out)?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                self.prompt(out)?;
                continue;
            }
            match line.parse::<ShellCommand>() {
                Ok(command) => {
                    if self.execute(command, out)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(message) => writeln!(out, "error: {message}")?,
            }
            self.prompt(out)?;
        }
        Ok(())
    }

    fn prompt<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "[{}] > ", self.current.as_deref().unwrap_or("-"))?;
        out.flush()
    }

    pub fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> io::Result<Flow> {
        debug!(?command, "shell command");
        if command != ShellCommand::Quit {
            self.quit_requested = false;
        }
        match command {
            ShellCommand::Rows(view) => {
                let status = match view {
                    RowsView::All => None,
                    RowsView::Pending => Some(PairingStatus::Pending),
                    RowsView::Paired => Some(PairingStatus::Paired),
                };
                let rows = self.bench.registry_rows(status);
                writeln!(out, "{}", registry_rows_table(&rows, &self.bench.session))?;
            }
            ShellCommand::Select(id) => {
                if self.bench.registry.contains(&id) {
                    self.select(id, out)?;
                } else {
                    writeln!(out, "error: unknown registry id '{id}'")?;
                }
            }
            ShellCommand::Next => {
                let next = self
                    .bench
                    .next_pending(self.current.as_deref())
                    .map(|record| record.registry_id.clone());
                match next {
                    Some(id) => self.select(id, out)?,
                    None => writeln!(out, "every registry row is paired")?,
                }
            }
            ShellCommand::Options => self.list_options(out)?,
            ShellCommand::Filter(text) => {
                self.text_filter = text;
                self.listed.clear();
                self.list_options(out)?;
            }
            ShellCommand::Global(text) => {
                self.global_filter = text;
                self.listed.clear();
                self.list_options(out)?;
            }
            ShellCommand::Pick(target) => self.pick(target, out)?,
            ShellCommand::Clear => {
                let Some(id) = self.current.clone() else {
                    writeln!(out, "error: no registry row selected")?;
                    return Ok(Flow::Continue);
                };
                match self.bench.session.propose(&id, None) {
                    Ok(outcome) => {
                        self.dirty |= outcome != ProposeOutcome::Unchanged;
                        self.listed.clear();
                        writeln!(out, "{id}: claim cleared")?;
                    }
                    Err(err) => writeln!(out, "error: {err}")?,
                }
            }
            ShellCommand::Suggest => {
                let Some(id) = self.current.clone() else {
                    writeln!(out, "error: no registry row selected")?;
                    return Ok(Flow::Continue);
                };
                let suggestions = self.bench.suggestions_for(&id, &self.ctx.suggestions);
                if suggestions.is_empty() {
                    writeln!(out, "no suggestions")?;
                } else {
                    self.listed = suggestions
                        .iter()
                        .map(|suggestion| suggestion.record.unique_key.clone())
                        .collect();
                    writeln!(out, "{}", suggestions_table(&suggestions))?;
                }
            }
            ShellCommand::Status => {
                writeln!(out, "{}", summary_table(&self.bench.summary()))?;
            }
            ShellCommand::Save => self.save(out)?,
            ShellCommand::Export(formats) => self.export(&formats, out)?,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => {
                if self.dirty && self.ctx.store.is_some() && !self.quit_requested {
                    self.quit_requested = true;
                    writeln!(out, "unsaved changes: 'save' first, or 'quit' again to discard")?;
                    return Ok(Flow::Continue);
                }
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn select<W: Write>(&mut self, id: String, out: &mut W) -> io::Result<()> {
        if let Some(record) = self.bench.registry.record(&id) {
            writeln!(out, "{}", record.header_line())?;
        }
        match self.bench.session.claim_of(&id) {
            Some(key) => writeln!(out, "current claim: {key}")?,
            None => writeln!(out, "no claim")?,
        }
        self.current = Some(id);
        self.text_filter.clear();
        self.listed.clear();
        Ok(())
    }

    fn list_options<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.listed.clear();
        let Some(id) = self.current.as_deref() else {
            return writeln!(out, "error: no registry row selected");
        };
        let options = self.bench.session.available_targets(
            &self.bench.survey,
            id,
            &self.text_filter,
            &self.global_filter,
        );
        self.listed = options
            .iter()
            .map(|record| record.unique_key.clone())
            .collect();
        if options.is_empty() {
            return writeln!(out, "no options");
        }
        let current = self.bench.session.claim_of(id);
        writeln!(out, "{}", options_table(&options, current))
    }

    fn pick<W: Write>(&mut self, target: PickTarget, out: &mut W) -> io::Result<()> {
        let Some(id) = self.current.clone() else {
            return writeln!(out, "error: no registry row selected");
        };
        let key = match target {
            PickTarget::Key(key) => key,
            PickTarget::Index(index) => {
                if self.listed.is_empty() {
                    self.list_options(&mut io::sink())?;
                }
                match index.checked_sub(1).and_then(|idx| self.listed.get(idx)) {
                    Some(key) => key.clone(),
                    None => {
                        return writeln!(
                            out,
                            "error: option {index} is out of range (1-{})",
                            self.listed.len()
                        );
                    }
                }
            }
        };
        match self.bench.session.propose(&id, Some(&key)) {
            Ok(ProposeOutcome::Unchanged) => {
                writeln!(out, "{id} already claims {key}")
            }
            Ok(_) => {
                self.dirty = true;
                self.listed.clear();
                writeln!(out, "{id} -> {key}")
            }
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn save<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let (Some(store), Some(project)) = (&self.ctx.store, &self.ctx.project) else {
            return writeln!(out, "error: no project: start the session with --project to save");
        };
        match self.bench.save(store, project, &self.ctx.operator) {
            Ok(rows) => {
                self.dirty = false;
                info!(project = %project, rows, "session saved");
                writeln!(out, "saved {rows} rows to project '{project}'")
            }
            Err(err) => writeln!(out, "error: {err:#} (session kept, retry with 'save')"),
        }
    }

    fn export<W: Write>(&mut self, formats: &[ExportFormat], out: &mut W) -> io::Result<()> {
        match self.bench.export(
            &self.ctx.export,
            &self.ctx.out_dir,
            &self.ctx.base_name,
            formats,
        ) {
            Ok(written) => {
                writeln!(out, "{}", partition_table(&written.counts, &self.ctx.export))?;
                for path in written.paths {
                    writeln!(out, "wrote {}", path.display())?;
                }
                Ok(())
            }
            Err(err) => writeln!(out, "error: {err:#} (session kept, retry with 'export')"),
        }
    }
}
