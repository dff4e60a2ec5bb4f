// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! jolokia - command-line client for Jolokia JMX agents

use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;

use jolokia_client::{
    Attribute, Client, InnerPath, MethodPolicy, Operation, Poller, Request, RequestOptions,
};

#[derive(Parser)]
#[command(
    name = "jolokia",
    version,
    about = "Command-line client for Jolokia JMX agents",
    long_about = "Talks to a Jolokia agent over HTTP: read and write MBean \
attributes, invoke operations, search and list MBeans, and watch attributes \
on a polling interval."
)]
struct Cli {
    /// Agent URL, e.g. http://localhost:8778/jolokia
    #[arg(short = 'U', long, global = true, env = "JOLOKIA_URL")]
    url: Option<String>,

    /// Basic-auth user
    #[arg(short, long, global = true, env = "JOLOKIA_USER")]
    user: Option<String>,

    /// Basic-auth password
    #[arg(short, long, global = true, env = "JOLOKIA_PASSWORD")]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// HTTP method selection (auto, get, or post)
    #[arg(short, long, global = true)]
    method: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read MBean attributes
    Read {
        /// MBean object name, e.g. java.lang:type=Memory
        mbean: String,
        /// Attribute names; omit to read all attributes
        attributes: Vec<String>,
        /// Descend into the returned value along this path, e.g. used
        #[arg(long)]
        path: Option<String>,
    },
    /// Write an MBean attribute and print its previous value
    Write {
        /// MBean object name
        mbean: String,
        /// Attribute name
        attribute: String,
        /// New value, parsed as JSON when it parses and kept as text
        /// otherwise
        value: String,
        /// Write inside the attribute at this path
        #[arg(long)]
        path: Option<String>,
    },
    /// Invoke an MBean operation
    Exec {
        /// MBean object name
        mbean: String,
        /// Operation name, optionally with a signature, e.g.
        /// loadUsers(java.lang.String)
        operation: String,
        /// Operation arguments, each parsed as JSON when it parses
        arguments: Vec<String>,
    },
    /// Find MBeans matching an object-name pattern
    Search {
        /// Pattern, e.g. java.lang:type=*
        pattern: String,
    },
    /// List MBean metadata known to the agent
    List {
        /// Restrict to this path, e.g. java.lang/type=Memory
        path: Option<String>,
    },
    /// Show agent version and capabilities
    Version,
    /// Poll an attribute on an interval and print each reading
    Watch {
        /// MBean object name
        mbean: String,
        /// Attribute names; omit to watch all attributes
        attributes: Vec<String>,
        /// Descend into the returned value along this path
        #[arg(long)]
        path: Option<String>,
        /// Poll interval in seconds
        #[arg(short, long, default_value_t = 5)]
        every: u64,
    },
}

impl Cli {
    fn request_options(&self) -> Result<RequestOptions> {
        let url = match &self.url {
            Some(url) => url.clone(),
            None => bail!("No agent URL configured\n\nPass --url or set JOLOKIA_URL."),
        };
        let mut options = RequestOptions::new().url(url);
        if let (Some(user), Some(password)) = (&self.user, &self.password) {
            options = options.basic_auth(user, password);
        }
        if let Some(seconds) = self.timeout {
            options = options.timeout(Duration::from_secs(seconds));
        }
        if let Some(method) = &self.method {
            options = options.method(method.parse::<MethodPolicy>()?);
        }
        Ok(options)
    }
}

/// `0` attribute names mean "all attributes", one stays scalar, more
/// become a multi-attribute read.
fn attribute_arg(mut names: Vec<String>) -> Option<Attribute> {
    match names.len() {
        0 => None,
        1 => Some(names.remove(0).into()),
        _ => Some(names.into()),
    }
}

/// CLI values are JSON when they parse (`756`, `true`, `[1,2]`) and
/// bare text otherwise (`all`).
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_value(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn watch(
    client: Client,
    mbean: String,
    attributes: Vec<String>,
    path: Option<String>,
    every: u64,
) -> Result<()> {
    let request = Request::new(Operation::Read {
        mbean,
        attribute: attribute_arg(attributes),
        path: path.map(InnerPath::from),
    });
    let options = RequestOptions::new()
        .on_success(|responses| {
            for response in responses {
                let timestamp = response
                    .timestamp
                    .map(|seconds| seconds.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let value = response.value.clone().unwrap_or(Value::Null);
                println!("[{}] {}", timestamp, value);
            }
        })
        .on_error(|error| {
            eprintln!("poll failed: {}", error);
        });

    let poller = Poller::new(client);
    poller.register(request, options);
    poller.start(Duration::from_secs(every.max(1)));

    eprintln!("Watching; press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await?;
    poller.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("jolokia=debug,jolokia_client=debug")
            .init();
    }

    let client = Client::with_options(cli.request_options()?)?;

    match cli.command {
        Commands::Read { mbean, attributes, path } => {
            let value = client
                .get(&mbean, attribute_arg(attributes), path.map(InnerPath::from), None)
                .await?;
            print_value(&value)
        }
        Commands::Write { mbean, attribute, value, path } => {
            let previous = client
                .set(&mbean, &attribute, parse_value(&value), path.map(InnerPath::from), None)
                .await?;
            print_value(&previous)
        }
        Commands::Exec { mbean, operation, arguments } => {
            let arguments = arguments.iter().map(|raw| parse_value(raw)).collect();
            let result = client.execute(&mbean, &operation, arguments, None).await?;
            print_value(&result)
        }
        Commands::Search { pattern } => print_value(&client.search(&pattern, None).await?),
        Commands::List { path } => {
            print_value(&client.list(path.map(InnerPath::from), None).await?)
        }
        Commands::Version => print_value(&client.version(None).await?),
        Commands::Watch { mbean, attributes, path, every } => {
            watch(client, mbean, attributes, path, every).await
        }
    }
}
