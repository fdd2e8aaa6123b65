use anyhow::{Context, Result, bail};
use clap::Parser;
use fluent_http::http::ENV_TIMEOUT;
use fluent_http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use log::debug;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;

/// fluent-http - issue an HTTP request and print the response
///
/// Default headers, timeout and TLS verification can be set through the
/// FLUENT_HTTP_HEADERS, FLUENT_HTTP_TIMEOUT and FLUENT_HTTP_VERIFY_SSL
/// environment variables.
///
/// Examples:
///   fluent-http get https://httpbin.org get -q page=1
///   fluent-http post https://httpbin.org post -t application/json --json '{"a":1}'
#[derive(Parser, Debug)]
#[command(author, version = env!("FLUENT_HTTP_VERSION"), about)]
struct Cli {
    /// Request method
    #[arg(value_enum, ignore_case = true)]
    method: Method,

    /// Base URL
    #[arg(value_name = "URL")]
    url: String,

    /// Path appended to the base URL
    #[arg(value_name = "PATH", default_value = "")]
    path: String,

    /// Request header, "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Query parameter, "name=value" (repeatable)
    #[arg(short = 'q', long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// Cookie, "name=value" (repeatable)
    #[arg(short = 'b', long = "cookie", value_name = "NAME=VALUE")]
    cookies: Vec<String>,

    /// Content-Type of the request body
    #[arg(short = 't', long = "content-type", value_name = "TYPE")]
    content_type: Option<String>,

    /// Accept header
    #[arg(long = "accept", value_name = "TYPE")]
    accept: Option<String>,

    /// Basic authentication, "user[:password]"
    #[arg(short = 'u', long = "user", value_name = "USER[:PASSWORD]")]
    user: Option<String>,

    /// Bearer token for the Authorization header
    #[arg(long = "bearer", value_name = "TOKEN")]
    bearer: Option<String>,

    /// Raw request body
    #[arg(short = 'd', long = "data", value_name = "BODY", conflicts_with_all = ["json", "form"])]
    data: Option<String>,

    /// JSON request body, encoded according to the Content-Type
    #[arg(long = "json", value_name = "JSON", conflicts_with = "form")]
    json: Option<String>,

    /// Structured body field, "name=value" (repeatable)
    #[arg(short = 'F', long = "form", value_name = "NAME=VALUE")]
    form: Vec<String>,

    /// Connect timeout in seconds
    #[arg(long = "timeout", env = ENV_TIMEOUT, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long = "insecure")]
    insecure: bool,

    /// Print the status line and response headers
    #[arg(short = 'i', long = "include")]
    include: bool,

    /// Write the response body to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Exit with an error when the response is a 4xx/5xx
    #[arg(short = 'f', long = "fail")]
    fail: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl From<Method> for HttpMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => HttpMethod::Get,
            Method::Put => HttpMethod::Put,
            Method::Post => HttpMethod::Post,
            Method::Delete => HttpMethod::Delete,
        }
    }
}

fn split_pair<'a>(raw: &'a str, sep: char, what: &str) -> Result<(&'a str, &'a str)> {
    match raw.split_once(sep) {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Invalid {} '{}', expected NAME{}VALUE", what, raw, sep),
    }
}

fn build_request(cli: &Cli) -> Result<HttpRequest> {
    let mut request = HttpRequest::create(cli.url.clone());

    for header in &cli.headers {
        let (name, value) = split_pair(header, ':', "header")?;
        request = request.header(name, value);
    }
    for param in &cli.params {
        let (name, value) = split_pair(param, '=', "parameter")?;
        request = request.parameter(name, value);
    }
    for cookie in &cli.cookies {
        let (name, value) = split_pair(cookie, '=', "cookie")?;
        request = request.cookie(name, value);
    }
    if let Some(content_type) = &cli.content_type {
        request = request.content_type(content_type);
    }
    if let Some(accept) = &cli.accept {
        request = request.accept(accept);
    }
    if let Some(user) = &cli.user {
        let (username, password) = user.split_once(':').unwrap_or((user.as_str(), ""));
        request = request.basic_authentication(username, password);
    }
    if let Some(token) = &cli.bearer {
        request = request.bearer(token)?;
    }
    if let Some(timeout) = cli.timeout {
        request = request.timeout(timeout);
    }
    if cli.insecure {
        request = request.verify_ssl_certificate(false);
    }

    Ok(request)
}

fn build_body(cli: &Cli) -> Result<Option<RequestBody>> {
    if let Some(data) = &cli.data {
        return Ok(Some(RequestBody::from(data.as_str())));
    }
    if let Some(json) = &cli.json {
        let value: Value = serde_json::from_str(json).context("Invalid --json body")?;
        return Ok(Some(RequestBody::Structured(value)));
    }
    if !cli.form.is_empty() {
        let mut fields = Map::new();
        for field in &cli.form {
            let (name, value) = split_pair(field, '=', "form field")?;
            fields.insert(name.to_string(), Value::String(value.to_string()));
        }
        return Ok(Some(RequestBody::Structured(Value::Object(fields))));
    }
    Ok(None)
}

fn print_response(cli: &Cli, response: &HttpResponse) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    if cli.include {
        writeln!(stdout, "{}", response.status())?;
        for (name, value) in response.headers().lines() {
            writeln!(stdout, "{}: {}", name, value)?;
        }
        writeln!(stdout)?;
    }

    match &cli.output {
        Some(path) => std::fs::write(path, response.content_raw())
            .with_context(|| format!("Failed to write response body to {}", path.display()))?,
        None => stdout.write_all(response.content_raw())?,
    }
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    debug!("{:?}", cli);

    let request = build_request(&cli)?;
    let body = build_body(&cli)?;
    let response = request.send(cli.method.into(), &cli.path, body)?;

    print_response(&cli, &response)?;

    if cli.fail && response.is_error() {
        bail!("Request to {} failed with {}", response.url(), response.status());
    }
    Ok(())
}
