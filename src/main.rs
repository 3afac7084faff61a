mod archive;
mod args;
mod context;
mod error;
mod request;
mod result;
mod utils;

use args::Args;
use context::Context;
use error::Error;
use request::PackageRequest;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    // Parse command-line arguments
    let Args {
        verbose,
        preserve_paths,
        dry_run,
        output,
        inputs,
    } = Args::parse();

    let ctx = Context::new(verbose, preserve_paths, dry_run);

    // Usage errors are reported as-is
    let request = PackageRequest::resolve(&inputs, output)?;

    cliclack::intro("fc-bundle")?;

    if ctx.dry_run {
        let plan = archive::plan(&ctx, &request).map_err(Error::compress)?;
        for entry in plan.entries() {
            cliclack::log::step(entry)?;
        }
        cliclack::outro(format!(
            "would write {} ({} entries)",
            request.output.display(),
            plan.entries().len()
        ))?;
        return Ok(());
    }

    archive::build(&ctx, &request).map_err(Error::compress)?;

    cliclack::outro(format!("wrote {}", request.output.display()))?;
    Ok(())
}
