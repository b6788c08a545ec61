// JSON payloads shaped like the service's responses.

use serde_json::{json, Value};

pub(crate) fn team_json(id: i64, abbreviation: &str) -> Value {
    json!({
        "id": id,
        "nome": format!("Team {abbreviation}"),
        "slug": abbreviation.to_lowercase(),
        "sigla": abbreviation
    })
}

pub(crate) fn game_json(id: i64) -> Value {
    json!({
        "id": id,
        "slug": format!("bos-vs-lal-{id}"),
        "data_jogo": "2024-03-01T19:30:00",
        "temporada": "2023-24",
        "status_jogo": "Final",
        "placar_casa": 110,
        "placar_visitante": 104,
        "time_casa": {"id": 1, "nome": "Boston Celtics", "slug": "celtics", "sigla": "BOS"},
        "time_visitante": {"id": 2, "nome": "Los Angeles Lakers", "slug": "lakers", "sigla": "LAL"},
        "liga_id": 1,
        "time_casa_id": 1,
        "time_visitante_id": 2
    })
}

pub(crate) fn user_summary_json(id: i64) -> Value {
    json!({"id": id, "username": format!("fan{id}"), "nivel_usuario": "Rookie"})
}

pub(crate) fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "username": format!("fan{id}"),
        "email": format!("fan{id}@example.com"),
        "data_cadastro": "2024-01-10T12:00:00",
        "nivel_usuario": "Starter",
        "pontos_experiencia": 120,
        "status": "ativo"
    })
}
