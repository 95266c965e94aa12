//! Pagination and fault-latch integration tests against a mock tracker.

use filelist_core::{ClientConfig, Credentials, FilelistScraper, VecSink};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FULL_PAGE: usize = 20;

fn torrent_row(id: u32) -> String {
    format!(
        "<div class='torrentrow'>\
         <a href='details.php?id={id}' title='Result.{id}.1080p'>Result {id}</a>\
         <font class='small'>1.2<br />GB</font>\
         <font color=#008000>5</font>\
         <span style='color: #720e0e'>2</span>\
         <div class='clearfix'></div></div>"
    )
}

fn results_page(rows: usize, start_id: u32, next_link: bool) -> String {
    let mut html = String::from("<html><body>Rezultatele cautarii dupa test");
    for i in 0..rows {
        html.push_str(&torrent_row(start_id + i as u32));
    }
    if next_link {
        html.push_str("<a href='browse.php?page=1'>Pagina urmatoare</a>");
    }
    html.push_str("</body></html>");
    html
}

fn scraper_for(server: &MockServer, max_pages: u32) -> FilelistScraper {
    let config = ClientConfig {
        base_url: server.uri(),
        max_retries: 0,
        max_pages,
        ..Default::default()
    };
    FilelistScraper::with_config(config, Credentials::default()).unwrap()
}

async fn browse_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/browse.php")
        .count()
}

#[tokio::test]
async fn single_partial_page_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(3, 1, false)))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    assert_eq!(sink.results.len(), 3);
    assert_eq!(browse_requests(&server).await, 1);
}

#[tokio::test]
async fn pagination_stops_at_ceiling_despite_endless_next_links() {
    let server = MockServer::start().await;
    // Every page claims to be full and to have a successor.
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(FULL_PAGE, 1, true)),
        )
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 3);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    assert_eq!(browse_requests(&server).await, 3);
    assert_eq!(sink.results.len(), 3 * FULL_PAGE);
}

#[tokio::test]
async fn two_page_result_set_fetches_exactly_two_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(FULL_PAGE, 1, true)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(5, 100, false)))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    assert_eq!(browse_requests(&server).await, 2);
    assert_eq!(sink.results.len(), FULL_PAGE + 5);
    assert_eq!(sink.results[0].id, "1");
    assert_eq!(sink.results[FULL_PAGE].id, "100");
}

#[tokio::test]
async fn full_page_without_next_link_stops_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(FULL_PAGE, 1, false)),
        )
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    assert_eq!(browse_requests(&server).await, 1);
    assert_eq!(sink.results.len(), FULL_PAGE);
}

#[tokio::test]
async fn empty_marker_stops_with_zero_entries_even_with_next_link() {
    let server = MockServer::start().await;
    let body = "<html><body>Rezultatele cautarii dupa test\
                Nu s-a gasit nimic!\
                <a href='browse.php?page=1'>Pagina urmatoare</a>\
                </body></html>";
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("nosuchthing", "all", &mut sink).await;

    assert!(sink.results.is_empty());
    assert_eq!(browse_requests(&server).await, 1);
}

#[tokio::test]
async fn unexpected_page_body_stops_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    assert!(sink.results.is_empty());
    assert_eq!(browse_requests(&server).await, 1);
}

#[tokio::test]
async fn unknown_category_falls_back_to_all_in_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .and(query_param("cat", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(1, 1, false)))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "pictures", &mut sink).await;

    assert_eq!(sink.results.len(), 1);
}

#[tokio::test]
async fn percent_space_query_is_sent_plus_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .and(query_param("search", "the mandalorian"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(1, 1, false)))
        .expect(1)
        .mount(&server)
        .await;

    // `+` in a query string decodes back to a space on the server side.
    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("the%20mandalorian", "all", &mut sink).await;

    assert_eq!(sink.results.len(), 1);
}

#[tokio::test]
async fn forbidden_response_latches_and_next_search_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();

    scraper.search("ubuntu", "all", &mut sink).await;
    assert!(sink.results.is_empty());
    assert!(scraper.client().critical_error());

    // The next call reports the fault without touching the network.
    let before = server.received_requests().await.unwrap().len();
    scraper.search("ubuntu", "all", &mut sink).await;
    assert_eq!(sink.results.len(), 1);
    assert!(sink.results[0].name.contains("filelist.log"));
    assert!(!scraper.client().critical_error());
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}

#[tokio::test]
async fn transient_404_is_retried_then_dropped_without_latching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        max_retries: 2,
        max_pages: 10,
        ..Default::default()
    };
    let scraper = FilelistScraper::with_config(config, Credentials::default()).unwrap();
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    // First attempt plus two retries, then the call chain gives up.
    assert_eq!(browse_requests(&server).await, 3);
    assert!(sink.results.is_empty());
    assert!(!scraper.client().critical_error());
}

#[tokio::test]
async fn redirect_to_login_submit_latches_the_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse.php"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/takelogin.php"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/takelogin.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Invalid login attempt!"),
        )
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    scraper.search("ubuntu", "all", &mut sink).await;

    assert!(sink.results.is_empty());
    assert!(scraper.client().critical_error());
}

#[tokio::test]
async fn download_torrent_writes_file_and_returns_origin_url() {
    let server = MockServer::start().await;
    let payload: &[u8] = b"d8:announce30:https://filelist.io/announce.phpe";
    Mock::given(method("GET"))
        .and(path("/download.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, 10);
    let mut sink = VecSink::new();
    let url = format!("{}/download.php?id=123456", server.uri());
    let (file_path, origin) = scraper
        .download_torrent(&url, &mut sink)
        .await
        .expect("download should succeed");

    assert_eq!(origin, url);
    assert_eq!(file_path.extension().and_then(|e| e.to_str()), Some("torrent"));
    assert_eq!(std::fs::read(&file_path).unwrap(), payload);
    assert!(sink.results.is_empty());
    std::fs::remove_file(file_path).ok();
}
