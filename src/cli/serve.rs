//! taskpad serve command.

use serde::Serialize;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::http;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::service::TaskService;

pub struct ServeOptions {
    pub server: ServerConfig,
    pub service: TaskService,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ServeOutput {
    addr: String,
    data: String,
}

pub fn run(options: ServeOptions) -> Result<()> {
    let addr = options.server.bind_addr();

    let output = ServeOutput {
        addr: addr.clone(),
        data: options.service.storage().path().display().to_string(),
    };
    let mut human = HumanOutput::new(format!("Serving taskpad on http://{addr}"));
    human.push_summary("Data", output.data.clone());
    human.push_summary("Stop", "Ctrl-C");
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "serve",
        &output,
        Some(&human),
    )?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| Error::OperationFailed(format!("cannot start runtime: {err}")))?;
    runtime.block_on(http::serve(options.service, &addr))
}
