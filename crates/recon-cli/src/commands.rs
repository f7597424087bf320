use std::io::{self, IsTerminal};

use anyhow::{Context, Result, bail};
use recon_cli::config::ReconConfig;
use recon_cli::pairs::read_pairs;
use recon_cli::render::{
    history_table, partition_table, projects_table, resolution_table, restore_lines,
    suggestions_table, summary_table,
};
use recon_cli::shell::{Shell, ShellContext};
use recon_cli::workbench::Workbench;
use recon_map::SuggestionParams;
use recon_model::PairingStatus;
use recon_persistence::HistoryStore;
use tracing::{info, info_span, warn};

use crate::cli::{ApplyArgs, DbArgs, ProjectArgs, SessionArgs, SuggestArgs, TablesArgs};

fn open_store(config: &ReconConfig, db: &DbArgs) -> Result<HistoryStore> {
    let path = config.db_path(db.db.as_deref());
    HistoryStore::open(&path).map_err(|err| {
        let mut message = err.user_message();
        if let Some(hint) = err.suggestion() {
            message.push_str(&format!(" {hint}"));
        }
        anyhow::Error::new(err).context(message)
    })
}

fn load_bench(config: &ReconConfig, tables: &TablesArgs) -> Result<Workbench> {
    Workbench::load(&tables.registry, &tables.survey, &config.rules())
}

fn restore_project(bench: &mut Workbench, store: &HistoryStore, project: &str) -> Result<()> {
    let report = bench.restore(store, project)?;
    for line in restore_lines(&report) {
        println!("{line}");
    }
    Ok(())
}

pub fn run_inspect(config: &ReconConfig, args: &TablesArgs) -> Result<()> {
    let bench = load_bench(config, args)?;
    println!(
        "Registry: {} ({} rows, {} columns)",
        args.registry.display(),
        bench.registry.len(),
        bench.registry.source.width()
    );
    println!(
        "{}",
        resolution_table(&bench.registry.resolutions, &bench.registry.key_stats)
    );
    println!(
        "Survey: {} ({} rows, {} columns)",
        args.survey.display(),
        bench.survey.len(),
        bench.survey.source.width()
    );
    println!(
        "{}",
        resolution_table(&bench.survey.resolutions, &bench.survey.key_stats)
    );
    Ok(())
}

pub fn run_suggest(config: &ReconConfig, args: &SuggestArgs) -> Result<()> {
    let mut bench = load_bench(config, &args.tables)?;
    if let Some(project) = &args.project {
        let store = open_store(config, &args.db)?;
        restore_project(&mut bench, &store, project)?;
    }
    let params = SuggestionParams {
        top_k: args.top_k.unwrap_or(config.suggestions.top_k),
        min_score: args.min_score.or(config.suggestions.min_score),
    };

    let ids: Vec<String> = match &args.id {
        Some(id) => {
            if !bench.registry.contains(id) {
                bail!("unknown registry id '{id}'");
            }
            vec![id.clone()]
        }
        None => bench
            .registry_rows(Some(PairingStatus::Pending))
            .into_iter()
            .map(|record| record.registry_id.clone())
            .collect(),
    };

    let span = info_span!("suggest", rows = ids.len(), top_k = params.top_k);
    let _guard = span.enter();
    for id in &ids {
        let Some(record) = bench.registry.record(id) else {
            continue;
        };
        println!("{}", record.header_line());
        let suggestions = bench.suggestions_for(id, &params);
        if suggestions.is_empty() {
            println!("  no suggestions");
        } else {
            println!("{}", suggestions_table(&suggestions));
        }
    }
    Ok(())
}

pub fn run_session(config: &ReconConfig, args: &SessionArgs) -> Result<()> {
    let mut bench = load_bench(config, &args.tables)?;
    let store = match &args.project {
        Some(project) => {
            let store = open_store(config, &args.db)?;
            restore_project(&mut bench, &store, project)?;
            Some(store)
        }
        None => None,
    };
    let ctx = ShellContext {
        export: config.export.clone(),
        suggestions: config.suggestions,
        store,
        project: args.project.clone(),
        operator: config.operator(args.operator.as_deref()),
        out_dir: args.output.out_dir.clone(),
        base_name: args.output.base_name.clone(),
    };
    if !io::stdin().is_terminal() {
        info!("reading session commands from a pipe");
    }
    let mut shell = Shell::new(&mut bench, &ctx);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell
        .run(stdin.lock(), &mut stdout)
        .context("interactive session")?;
    if shell.is_dirty() && ctx.store.is_some() {
        warn!("session ended with unsaved changes");
    }
    Ok(())
}

pub fn run_apply(config: &ReconConfig, args: &ApplyArgs) -> Result<()> {
    if !args.save && !args.export {
        bail!("nothing to do: pass --save and/or --export");
    }
    let mut bench = load_bench(config, &args.tables)?;
    let store = match &args.project {
        Some(project) => {
            let store = open_store(config, &args.db)?;
            restore_project(&mut bench, &store, project)?;
            Some(store)
        }
        None => None,
    };

    let pairs = read_pairs(&args.pairs)?;
    let report = bench.apply_pairs(&pairs);
    println!(
        "applied {} pairs: {} claimed, {} cleared, {} unchanged, {} rejected",
        pairs.len(),
        report.claimed,
        report.cleared,
        report.unchanged,
        report.rejected.len()
    );
    for (line, message) in &report.rejected {
        eprintln!("line {line}: {message}");
    }
    println!("{}", summary_table(&bench.summary()));

    if args.save
        && let (Some(store), Some(project)) = (&store, &args.project)
    {
        let operator = config.operator(args.operator.as_deref());
        let rows = bench.save(store, project, &operator)?;
        println!("saved {rows} rows to project '{project}'");
    }
    if args.export {
        let written = bench.export(
            &config.export,
            &args.output.out_dir,
            &args.output.base_name,
            &args.output.format.formats(),
        )?;
        println!("{}", partition_table(&written.counts, &config.export));
        for path in &written.paths {
            println!("wrote {}", path.display());
        }
    }
    if !report.rejected.is_empty() {
        bail!("{} pairs were rejected", report.rejected.len());
    }
    Ok(())
}

pub fn run_projects(config: &ReconConfig, args: &DbArgs) -> Result<()> {
    let store = open_store(config, args)?;
    let projects = store.list_projects()?;
    if projects.is_empty() {
        println!("no projects in {}", store.path().display());
    } else {
        println!("{}", projects_table(&projects));
    }
    Ok(())
}

pub fn run_history(config: &ReconConfig, args: &ProjectArgs) -> Result<()> {
    let store = open_store(config, &args.db)?;
    let entries = store.load_records(&args.project)?;
    if entries.is_empty() {
        println!("no history for project '{}'", args.project);
        return Ok(());
    }
    println!("{}", history_table(&entries));
    Ok(())
}

pub fn run_clear(config: &ReconConfig, args: &ProjectArgs) -> Result<()> {
    let store = open_store(config, &args.db)?;
    let removed = store.clear_project(&args.project)?;
    println!("removed {removed} rows from project '{}'", args.project);
    Ok(())
}
