use std::env;
use std::process::ExitCode;
use std::time::Instant;

use vexpr::{ExpressionContext, Orchestrator, Value};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let Some(text) = args.get(1) else {
        eprintln!("usage: vexpr-cli <expression-or-template> [context.json]");
        return ExitCode::FAILURE;
    };

    let ctx = match args.get(2) {
        Some(path) => match read_context(path) {
            Ok(ctx) => ctx,
            Err(err) => {
                eprintln!("error reading context: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => ExpressionContext::new(),
    };

    let mut orchestrator = Orchestrator::new();
    let start = Instant::now();
    match orchestrator.evaluate(text, &ctx) {
        Ok(value) => {
            let elapsed = start.elapsed();
            eprintln!("evaluated in {elapsed:?}");
            println!("{}", render(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error ({}): {}", err.kind, err.message);
            ExitCode::FAILURE
        }
    }
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(&value.to_json()).unwrap_or_else(|_| value.to_display_string())
}

fn read_context(path: &str) -> Result<ExpressionContext, String> {
    let text = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    let json: serde_json::Value = serde_json::from_str(&text).map_err(|err| err.to_string())?;
    let serde_json::Value::Object(map) = json else {
        return Err("context file must contain a JSON object".to_owned());
    };
    let mut ctx = ExpressionContext::new();
    for (key, value) in map {
        ctx.insert(key, Value::from_json(value));
    }
    Ok(ctx)
}
