use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Parser)]
#[command(name = "f5-mock-cli")]
#[command(about = "Management CLI for the F5 API mock", long_about = None)]
struct Cli {
    #[arg(short, long, env = "F5_URL", default_value = "https://localhost:4443")]
    url: String,

    #[arg(long, env = "F5_ADMIN_USERNAME", default_value = "admin")]
    username: String,

    #[arg(long, env = "F5_ADMIN_PASSWORD", default_value = "admin", hide_env_values = true)]
    password: String,

    /// Session token; replaces basic credentials when the mock runs with a login provider
    #[arg(long, env = "F5_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Accept the mock's self-signed certificate
    #[arg(short = 'k', long)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Obtain a session token
    Login {
        #[arg(long, default_value = "tmos")]
        provider: String,
    },
    /// List client SSL profiles
    Profiles {
        #[arg(long)]
        partition: Option<String>,
    },
    /// Show one client SSL profile, e.g. ~Common~clientssl
    Profile { id: String },
    /// Upload a local file
    Upload {
        file: PathBuf,
        /// Name under the upload directory; defaults to the file name
        #[arg(long)]
        name: Option<String>,
    },
    /// Install an uploaded file as a certificate
    InstallCert { name: String, from_local_file: String },
    /// Install an uploaded file as a private key
    InstallKey { name: String, from_local_file: String },
    /// Show the declarative tree
    Declare,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;

    let mut headers = HeaderMap::new();
    match &cli.token {
        Some(token) => {
            headers.insert("X-F5-Auth-Token", HeaderValue::from_str(token)?);
        }
        None => {
            let credentials = STANDARD.encode(format!("{}:{}", cli.username, cli.password));
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Basic {}", credentials))?);
        }
    }

    let base = cli.url.trim_end_matches('/');
    let res = match cli.command {
        Commands::Login { provider } => {
            client
                .post(format!("{}/mgmt/shared/authn/login", base))
                .json(&json!({
                    "username": cli.username,
                    "password": cli.password,
                    "loginProvider": provider,
                }))
                .send()
                .await?
        }
        Commands::Profiles { partition } => {
            let mut req = client
                .get(format!("{}/mgmt/tm/ltm/profile/client-ssl", base))
                .headers(headers);
            if let Some(partition) = partition {
                req = req.query(&[("$filter", format!("partition eq {}", partition))]);
            }
            req.send().await?
        }
        Commands::Profile { id } => {
            client
                .get(format!("{}/mgmt/tm/ltm/profile/client-ssl/{}", base, id))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Upload { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or("upload path has no file name")?,
            };
            let content = tokio::fs::read(&file).await?;
            client
                .post(format!("{}/mgmt/shared/file-transfer/uploads/{}", base, name))
                .headers(headers)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(content)
                .send()
                .await?
        }
        Commands::InstallCert { name, from_local_file } => {
            install(&client, headers, &format!("{}/mgmt/tm/sys/crypto/cert", base), &name, &from_local_file).await?
        }
        Commands::InstallKey { name, from_local_file } => {
            install(&client, headers, &format!("{}/mgmt/tm/sys/crypto/key", base), &name, &from_local_file).await?
        }
        Commands::Declare => {
            client
                .get(format!("{}/mgmt/shared/appsvcs/declare", base))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn install(
    client: &reqwest::Client,
    headers: HeaderMap,
    url: &str,
    name: &str,
    from_local_file: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .post(url)
        .headers(headers)
        .json(&json!({
            "command": "install",
            "name": name,
            "from-local-file": from_local_file,
        }))
        .send()
        .await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
