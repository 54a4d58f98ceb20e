/* 📖 # Why does the CLI read identifiers from stdin?

The page has one input and one submit action, so the binary treats every line
on stdin as a submission and prints the page again once it has settled. There
is no argument parsing; the lookup service is located through `THING_HOST`,
`THING_PORT` and `THING_SCHEME`.

Exit codes:
- 0: stdin reached end of file
- 1: Error (invalid configuration, unreadable stdin, unwritable stdout)
*/

use std::io::{self, BufRead, Write};
use std::process;

use thing_lookup_base::tracing::init_tracing;
use thing_lookup_base::{LookupResult, PalHandle, RealPal, ResultExt, ThingLookupError};
use thing_lookup_engine::{
    HttpLookupService, LookupController, LookupService, TextView, load_config,
};
use tracing::info;

fn io_error(e: io::Error) -> Box<ThingLookupError> {
    Box::new(ThingLookupError::from(e))
}

fn build_controller(pal: PalHandle) -> LookupResult<LookupController<HttpLookupService, TextView>> {
    let config = load_config(&pal).context("loading lookup configuration")?;
    info!(base_url = %config.base_url(), "thing lookup ready");
    let service = HttpLookupService::new(pal, &config);
    Ok(LookupController::new(service, TextView::new()))
}

fn write_page(output: &mut impl Write, view: &TextView) -> LookupResult<()> {
    writeln!(output, "{}", view.render())
        .and_then(|_| output.flush())
        .map_err(io_error)
        .context("writing page")
}

/// Print the idle page, then submit every input line and print the page again.
fn run<S: LookupService>(
    controller: &mut LookupController<S, TextView>,
    input: impl BufRead,
    mut output: impl Write,
) -> LookupResult<()> {
    write_page(&mut output, controller.view())?;
    for line in input.lines() {
        let id = line.map_err(io_error).context("reading submission")?;
        controller.on_submit(&id);
        write_page(&mut output, controller.view())?;
    }
    Ok(())
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let result = build_controller(PalHandle::new(RealPal::new()))
        .and_then(|mut controller| run(&mut controller, io::stdin().lock(), io::stdout().lock()));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
