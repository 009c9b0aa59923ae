//! HTTP-level tests for the GitHub contents client
//!
//! A tiny responder on a local TCP port answers with canned responses and
//! records every request it sees, one connection per request.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use treepush::check::{check_connection, ConnectionStatus};
use treepush::classify::decode_payload;
use treepush::{Config, FileRecord, GithubStore, RemoteState, UploadClient, UploadStatus};

#[derive(Debug)]
struct Captured {
	method: String,
	target: String,
	headers: Vec<(String, String)>,
	body: String,
}

impl Captured {
	fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
	}

	fn json(&self) -> serde_json::Value {
		serde_json::from_str(&self.body).unwrap()
	}
}

async fn read_request(stream: &mut TcpStream) -> Captured {
	let mut reader = BufReader::new(stream);
	let mut line = String::new();
	reader.read_line(&mut line).await.unwrap();
	let mut parts = line.split_whitespace();
	let method = parts.next().unwrap_or_default().to_string();
	let target = parts.next().unwrap_or_default().to_string();

	let mut headers = Vec::new();
	loop {
		line.clear();
		reader.read_line(&mut line).await.unwrap();
		let trimmed = line.trim_end();
		if trimmed.is_empty() {
			break;
		}
		if let Some((name, value)) = trimmed.split_once(':') {
			headers.push((name.trim().to_lowercase(), value.trim().to_string()));
		}
	}

	let length = headers
		.iter()
		.find(|(k, _)| k == "content-length")
		.and_then(|(_, v)| v.parse::<usize>().ok())
		.unwrap_or(0);
	let mut body = vec![0u8; length];
	reader.read_exact(&mut body).await.unwrap();

	Captured { method, target, headers, body: String::from_utf8(body).unwrap() }
}

/// Serve `responses` in order, one connection each, and return what was asked
async fn respond_with(
	responses: Vec<(u16, &'static str)>,
) -> (String, JoinHandle<Vec<Captured>>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let base = format!("http://{}", listener.local_addr().unwrap());

	let handle = tokio::spawn(async move {
		let mut seen = Vec::new();
		for (status, body) in responses {
			let (mut stream, _) = listener.accept().await.unwrap();
			seen.push(read_request(&mut stream).await);
			let reply = format!(
				"HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
				status,
				body.len(),
				body
			);
			stream.write_all(reply.as_bytes()).await.unwrap();
			stream.shutdown().await.ok();
		}
		seen
	});
	(base, handle)
}

fn config(base: &str) -> Config {
	Config {
		token: "t0ken".into(),
		owner: "octocat".into(),
		repo: "site".into(),
		api_base: base.into(),
		..Default::default()
	}
}

fn client(config: Config) -> UploadClient {
	let store = GithubStore::new(&config).unwrap();
	UploadClient::new(Arc::new(store), Arc::new(config))
}

fn text(path: &str, body: &str) -> FileRecord {
	FileRecord { path: path.into(), content: body.as_bytes().to_vec(), is_binary: false }
}

#[tokio::test]
async fn test_update_sends_lookup_then_write_with_fingerprint() {
	let (base, server) =
		respond_with(vec![(200, r#"{"sha":"abc123","type":"file"}"#), (200, r#"{"content":{}}"#)])
			.await;

	let outcome = client(config(&base)).upload(&text("docs/read me.md", "# hi\n")).await;
	assert_eq!(outcome.status, UploadStatus::Updated);

	let seen = server.await.unwrap();
	assert_eq!(seen.len(), 2);

	assert_eq!(seen[0].method, "GET");
	assert_eq!(seen[0].target, "/repos/octocat/site/contents/docs/read%20me.md");
	assert_eq!(seen[1].method, "PUT");
	assert_eq!(seen[1].target, seen[0].target);

	let body = seen[1].json();
	assert_eq!(body["sha"], "abc123");
	assert_eq!(body["branch"], "main");
	assert_eq!(body["message"], "Update docs/read me.md");
	assert_eq!(decode_payload(body["content"].as_str().unwrap()).unwrap(), b"# hi\n");
}

#[tokio::test]
async fn test_every_request_carries_api_headers() {
	let (base, server) = respond_with(vec![(404, r#"{"message":"Not Found"}"#), (201, "{}")]).await;

	client(config(&base)).upload(&text("a.txt", "x")).await;

	for request in server.await.unwrap() {
		assert_eq!(request.header("authorization"), Some("Bearer t0ken"));
		assert_eq!(request.header("accept"), Some("application/vnd.github.v3+json"));
		assert_eq!(request.header("x-github-api-version"), Some("2022-11-28"));
		assert!(request.header("user-agent").unwrap().starts_with("treepush/"));
	}
}

#[tokio::test]
async fn test_absent_file_is_created_without_fingerprint() {
	let (base, server) =
		respond_with(vec![(404, r#"{"message":"Not Found"}"#), (201, r#"{"content":{}}"#)]).await;

	let outcome = client(config(&base)).upload(&text("new.txt", "fresh")).await;
	assert_eq!(outcome.status, UploadStatus::Created);

	let seen = server.await.unwrap();
	let body = seen[1].json();
	assert!(body.get("sha").is_none());
	assert_eq!(body["content"], "ZnJlc2g=");
}

#[tokio::test]
async fn test_rejected_write_keeps_status_and_body() {
	let (base, server) = respond_with(vec![
		(200, r#"{"sha":"old"}"#),
		(409, r#"{"message":"a.txt does not match old"}"#),
	])
	.await;

	let outcome = client(config(&base)).upload(&text("a.txt", "x")).await;
	server.await.unwrap();

	assert_eq!(outcome.status, UploadStatus::Failed);
	assert_eq!(outcome.detail.as_deref(), Some(r#"409: {"message":"a.txt does not match old"}"#));
}

#[tokio::test]
async fn test_lookup_status_is_query_error() {
	let (base, server) = respond_with(vec![(403, r#"{"message":"rate limited"}"#)]).await;

	let state = client(config(&base)).lookup("a.txt").await;
	server.await.unwrap();

	assert_eq!(state, RemoteState::QueryError(r#"403: {"message":"rate limited"}"#.into()));
}

#[tokio::test]
async fn test_silent_server_times_out() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let base = format!("http://{}", listener.local_addr().unwrap());
	let holder = tokio::spawn(async move {
		let mut open = Vec::new();
		while let Ok((stream, _)) = listener.accept().await {
			open.push(stream);
		}
	});

	let config = Config { request_timeout_secs: 1, ..config(&base) };
	let outcome = tokio::time::timeout(
		Duration::from_secs(30),
		client(config).upload(&text("a.txt", "x")),
	)
	.await
	.unwrap();
	holder.abort();

	assert_eq!(outcome.status, UploadStatus::Failed);
	assert_eq!(outcome.detail.as_deref(), Some("Request timed out"));
}

#[tokio::test]
async fn test_check_reports_repository() {
	let (base, server) = respond_with(vec![(
		200,
		r#"{"full_name":"octocat/site","description":null,"private":false,"html_url":"https://github.com/octocat/site","id":1}"#,
	)])
	.await;

	let store = GithubStore::new(&config(&base)).unwrap();
	let status = check_connection(&store).await;
	let seen = server.await.unwrap();

	assert_eq!(seen[0].target, "/repos/octocat/site");
	match status {
		ConnectionStatus::Ok(info) => {
			assert_eq!(info.full_name, "octocat/site");
			assert!(!info.private);
			assert_eq!(info.description, None);
		}
		other => panic!("unexpected status {:?}", other),
	}
}

#[tokio::test]
async fn test_check_bad_credentials() {
	let (base, server) = respond_with(vec![(401, r#"{"message":"Bad credentials"}"#)]).await;

	let store = GithubStore::new(&config(&base)).unwrap();
	assert_eq!(check_connection(&store).await, ConnectionStatus::AuthenticationFailed);
	server.await.unwrap();
}

#[tokio::test]
async fn test_check_unreachable() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let base = format!("http://{}", listener.local_addr().unwrap());
	drop(listener);

	let store = GithubStore::new(&config(&base)).unwrap();
	assert!(matches!(check_connection(&store).await, ConnectionStatus::Unreachable(_)));
}

// vim: ts=4
