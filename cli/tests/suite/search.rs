use super::Workspace;
use super::strata_command;
use anyhow::Result;
use predicates::str::contains;
use std::net::TcpListener;

#[test]
fn unreachable_index_fails_the_search() -> Result<()> {
    let workspace = Workspace::new()?;
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    strata_command()?
        .arg("search")
        .arg("--entities")
        .arg(&workspace.entities)
        .args(["--query", "path=italy"])
        .args(["--engine-url", &format!("http://127.0.0.1:{port}/solr/strata")])
        .args(["--timeout-ms", "2000"])
        .assert()
        .failure()
        .stderr(contains("search for 'path=italy' failed"));
    Ok(())
}

#[test]
fn invalid_engine_url_is_rejected() -> Result<()> {
    let workspace = Workspace::new()?;
    strata_command()?
        .arg("search")
        .arg("--entities")
        .arg(&workspace.entities)
        .args(["--engine-url", "ftp://index"])
        .assert()
        .failure()
        .stderr(contains("invalid search configuration"));
    Ok(())
}
