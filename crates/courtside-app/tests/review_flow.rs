// Game page flows driven through the real ApiClient against a routed HTTP
// server on 127.0.0.1.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

use courtside_api::{ApiClient, ApiError, Gateway, Session};
use courtside_app::{GameDetailView, ReviewForm};
use courtside_core::storage::MemoryTokenStore;

/// One expected request: the request line must start with `route`.
struct Route {
    route: &'static str,
    status: u16,
    body: Value,
}

fn route(route: &'static str, status: u16, body: Value) -> Route {
    Route {
        route,
        status,
        body,
    }
}

/// Answer each request with the first unused route matching its request
/// line. Stops once every route has been served.
async fn serve(mut routes: Vec<Route>) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        while !routes.is_empty() {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let index = routes
                .iter()
                .position(|r| request.starts_with(r.route))
                .unwrap_or_else(|| {
                    panic!("unexpected request: {}", request.lines().next().unwrap_or(""))
                });
            let matched = routes.remove(index);
            requests.push(request);

            let body = matched.body.to_string();
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                matched.status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        }
        requests
    });

    (addr, handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

fn team(id: i64, abbreviation: &str) -> Value {
    json!({
        "id": id,
        "nome": abbreviation,
        "slug": abbreviation.to_lowercase(),
        "sigla": abbreviation
    })
}

fn game() -> Value {
    json!({
        "id": 9, "slug": "bos-vs-lal-9", "data_jogo": "2024-03-01T19:30:00",
        "temporada": "2023-24", "status_jogo": "Final",
        "placar_casa": 110, "placar_visitante": 104,
        "time_casa": team(1, "BOS"), "time_visitante": team(2, "LAL"),
        "liga_id": 1, "time_casa_id": 1, "time_visitante_id": 2
    })
}

fn me() -> Value {
    json!({
        "id": 4, "username": "fan4", "email": "fan4@example.com",
        "data_cadastro": "2024-01-10T12:00:00", "nivel_usuario": "Rookie",
        "pontos_experiencia": 0, "status": "ativo"
    })
}

fn review(id: i64, overall: f64) -> Value {
    json!({
        "id": id, "nota_geral": overall, "nota_ataque_casa": 4.5,
        "data_avaliacao": "2024-03-02T10:00:00", "curtidas": 0,
        "usuario": {"id": 4, "username": "fan4", "nivel_usuario": "Rookie"},
        "jogo": game()
    })
}

async fn signed_in(addr: SocketAddr) -> (Arc<ApiClient>, Arc<Session>) {
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let api = Arc::new(ApiClient::new(Gateway::new(base, None).unwrap()));
    let session = Session::new(api.clone(), Arc::new(MemoryTokenStore::with_token("tok")));
    session.hydrate().await.unwrap().expect("token accepted");
    (api, Arc::new(session))
}

#[tokio::test]
async fn submitted_review_shows_up_after_refetch() {
    let (addr, server) = serve(vec![
        route("GET /usuarios/me ", 200, me()),
        route("GET /jogos/slug/bos-vs-lal-9 ", 200, game()),
        route("GET /jogos/9/avaliacoes/ ", 200, json!([])),
        route("POST /jogos/9/avaliacoes/ ", 201, review(31, 4.5)),
        route("GET /jogos/9/avaliacoes/ ", 200, json!([review(31, 4.5)])),
    ])
    .await;
    let (api, session) = signed_in(addr).await;
    let mut view = GameDetailView::new(api, session, "bos-vs-lal-9");

    view.load().await.unwrap();
    assert!(view.reviews().is_empty());

    let mut form = ReviewForm::new(4.5);
    form.draft.scores.home_attack = Some(4.5);
    let outcome = view.submit_review(&form).await.unwrap();
    assert!(!outcome.is_stale());
    assert_eq!(view.reviews().len(), 1);
    assert_eq!(view.my_review().map(|r| r.id), Some(31));
    assert_eq!(view.overall_average(), Some(4.5));

    let requests = server.await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.starts_with("POST"))
        .expect("review was posted");
    assert!(post.to_lowercase().contains("authorization: bearer tok"));
    assert!(post.contains("\"nota_geral\":4.5"));
}

#[tokio::test]
async fn failed_refetch_keeps_old_list_marked_stale() {
    let (addr, server) = serve(vec![
        route("GET /usuarios/me ", 200, me()),
        route("GET /jogos/slug/bos-vs-lal-9 ", 200, game()),
        route("GET /jogos/9/avaliacoes/ ", 200, json!([review(31, 3.0)])),
        route("PUT /avaliacoes/31 ", 200, review(31, 5.0)),
        route("GET /jogos/9/avaliacoes/ ", 503, json!({"detail": "maintenance"})),
    ])
    .await;
    let (api, session) = signed_in(addr).await;
    let mut view = GameDetailView::new(api, session, "bos-vs-lal-9");
    view.load().await.unwrap();

    let mut form = ReviewForm::edit(view.my_review().unwrap());
    form.draft.scores.overall = 5.0;
    let outcome = view.submit_review(&form).await.unwrap();

    assert!(outcome.is_stale());
    assert_eq!(outcome.written().scores.overall, 5.0);
    assert!(view.reviews_model().is_stale());
    assert_eq!(view.reviews()[0].review().scores.overall, 3.0);
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_scores_never_reach_the_server() {
    let (addr, server) = serve(vec![
        route("GET /usuarios/me ", 200, me()),
        route("GET /jogos/slug/bos-vs-lal-9 ", 200, game()),
        route("GET /jogos/9/avaliacoes/ ", 200, json!([])),
    ])
    .await;
    let (api, session) = signed_in(addr).await;
    let mut view = GameDetailView::new(api, session, "bos-vs-lal-9");
    view.load().await.unwrap();

    let err = view.submit_review(&ReviewForm::new(4.3)).await.unwrap_err();
    assert!(matches!(err, ApiError::Invalid { .. }));
    assert_eq!(server.await.unwrap().len(), 3);
}
