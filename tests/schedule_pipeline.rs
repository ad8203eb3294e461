use std::fs;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use predicates::prelude::*;
use schedscrape::formats::Schedule;
use serde_json::{Value, json};

static SCHEDULE_PAGE: &str = include_str!("fixtures/schedule_2023_03_26.html");

static REDESIGNED_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Schedules</title></head>
  <body><p>Programmes are now rendered client-side.</p></body>
</html>
"#;

fn spawn_schedule_server() -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let addr = server.server_addr();
    let base_url = format!("http://{addr}");

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let (status, body) = match request.url() {
                "/schedules/p00fzl7j/2023/03/26" => (200, SCHEDULE_PAGE),
                "/schedules/p00fzl7j/2023/03/27" => (200, REDESIGNED_PAGE),
                _ => (404, "not found"),
            };

            let mut response = tiny_http::Response::from_string(body).with_status_code(status);
            if status == 200 {
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/html; charset=utf-8"[..],
                )
                .expect("build header");
                response = response.with_header(header);
            }

            let _ = request.respond(response);
        }
    });

    (base_url, shutdown_tx, handle)
}

fn fetch_cmd(base_url: &str, date: &str, out: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("schedscrape");
    cmd.env_remove("RUST_LOG").env_remove("SCHEDSCRAPE_LOG").args([
        "fetch",
        "--base-url",
        &format!("{base_url}/schedules"),
        "--date",
        date,
        "--out",
        out,
    ]);
    cmd
}

fn expected_schedule() -> Value {
    json!({
        "1": {
            "PID": "m001k3hs",
            "NAME": "Shipping Forecast",
            "START_TIME": "2023-03-26T00:30:00+00:00",
            "END_TIME": "2023-03-26T00:48:00+00:00"
        },
        "2": {
            "PID": "m001k3j2",
            "NAME": "Bells on Sunday",
            "START_TIME": "2023-03-26T05:43:00+01:00",
            "END_TIME": "2023-03-26T05:45:00+01:00"
        }
    })
}

#[test]
fn fetch_writes_dated_schedule() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_schedule_server();
    let temp = tempfile::TempDir::new()?;
    let json_dir = temp.path().join("json");
    let json_dir_str = json_dir.to_str().unwrap();

    fetch_cmd(&base_url, "2023-03-26", json_dir_str)
        .assert()
        .success()
        .stderr(predicate::str::contains("schedule saved"));

    let schedule_path = json_dir.join("2023-03-26.json");
    let written = fs::read_to_string(&schedule_path)?;
    let value: Value = serde_json::from_str(&written)?;
    assert_eq!(value, expected_schedule());

    let key_1 = written.find("\"1\"").expect("key 1");
    let key_2 = written.find("\"2\"").expect("key 2");
    assert!(key_1 < key_2, "keys must be written in order");

    let schedule: Schedule = serde_json::from_str(&written)?;
    assert_eq!(schedule.len(), 2);

    // Existing output is left alone unless forced; a forced rerun is byte-identical.
    fetch_cmd(&base_url, "2023-03-26", json_dir_str)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fetch_cmd(&base_url, "2023-03-26", json_dir_str)
        .arg("--force")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&schedule_path)?, written);

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn page_without_structured_data_fails_without_output() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_schedule_server();
    let temp = tempfile::TempDir::new()?;
    let json_dir = temp.path().join("json");

    fetch_cmd(&base_url, "2023-03-27", json_dir.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no JSON-LD structured data found"));
    assert!(!json_dir.join("2023-03-27.json").exists());

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn http_error_status_fails_the_run() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_schedule_server();
    let temp = tempfile::TempDir::new()?;
    let json_dir = temp.path().join("json");

    fetch_cmd(&base_url, "2023-03-28", json_dir.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"))
        .stderr(predicate::str::contains("/schedules/p00fzl7j/2023/03/28"));
    assert!(!json_dir.exists());

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn parse_and_show_work_offline() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let html_path = temp.path().join("schedule.html");
    fs::write(&html_path, SCHEDULE_PAGE)?;

    let output = assert_cmd::cargo::cargo_bin_cmd!("schedscrape")
        .args(["parse", "--html", html_path.to_str().unwrap()])
        .output()?;
    assert!(output.status.success());
    let stdout_value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(stdout_value, expected_schedule());

    let out_path = temp.path().join("out").join("2023-03-26.json");
    assert_cmd::cargo::cargo_bin_cmd!("schedscrape")
        .args([
            "parse",
            "--html",
            html_path.to_str().unwrap(),
            "--url",
            "https://www.bbc.co.uk/schedules/p00fzl7j/2023/03/26",
            "--out",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();
    assert_eq!(
        serde_json::from_str::<Value>(&fs::read_to_string(&out_path)?)?,
        expected_schedule()
    );

    assert_cmd::cargo::cargo_bin_cmd!("schedscrape")
        .args(["show", "--schedule", out_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  1  2023-03-26T00:30:00+00:00  2023-03-26T00:48:00+00:00  m001k3hs  Shipping Forecast\n",
        ))
        .stdout(predicate::str::contains(
            "  2  2023-03-26T05:43:00+01:00  2023-03-26T05:45:00+01:00  m001k3j2  Bells on Sunday\n",
        ));

    Ok(())
}
