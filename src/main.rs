mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;

use infrastructure::{AppContainer, HandlerSettings, telemetry};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Settings, logging and clients are built once per container.
    let settings = HandlerSettings::from_env()?;
    telemetry::init_tracing(&settings)?;

    let container = AppContainer::new(&settings).await?;
    let handler = container.classification_handler.clone();

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move { handler.handle(event).await }
    }))
    .await
}
