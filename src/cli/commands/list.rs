//! `tracekit list` command - known corpora and on-disk availability

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::args::GlobalOpts;
use crate::core::Config;
use crate::corpus::descriptor::{RequirementsLayout, CORPORA};

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only show corpora present under the datasets directory
    #[arg(long)]
    pub available: bool,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let base = super::resolve_datasets_dir(global, &config);

    let mut builder = Builder::default();
    builder.push_record(["KEY", "NAME", "LANGUAGE", "LAYOUT", "EXPECTED REQS", "ON DISK"]);

    let mut shown = 0;
    for corpus in CORPORA {
        let present = base.join(corpus.display_name).is_dir();
        if args.available && !present {
            continue;
        }
        shown += 1;

        let layout = match corpus.requirements {
            RequirementsLayout::Directory(_) => "directory",
            RequirementsLayout::SingleFile(_) => "single file",
        };
        let expected = corpus
            .expected_requirements
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());

        builder.push_record([
            corpus.key,
            corpus.display_name,
            corpus.language,
            layout,
            &expected,
            if present { "yes" } else { "no" },
        ]);
    }

    if shown == 0 {
        println!(
            "{} no corpora found under {}",
            style("warning:").yellow().bold(),
            base.display()
        );
        return Ok(());
    }

    println!("{}", builder.build().with(Style::blank()));

    if !global.quiet {
        println!();
        println!("Datasets directory: {}", base.display());
    }

    Ok(())
}
