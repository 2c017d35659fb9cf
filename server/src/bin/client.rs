use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() {
    let url = std::env::args().nth(1).unwrap_or_else(|| "ws://127.0.0.1:8080/ws".to_string());
    // modes: start <device> | join <player_id> <seat_number> <buy_in>
    //      | fold <player_id> <seat_id> | check <player_id> <seat_id>
    //      | raise <player_id> <seat_id> <amount> | call <player_id> <seat_id>
    //      | all_in <player_id> <seat_id>
    let mode = std::env::args().nth(2).unwrap_or_else(|| "start".to_string());
    let (mut ws, _resp) = connect_async(url.as_str()).await.expect("connect");

    let outgoing = match mode.as_str() {
        "start" => {
            let device = std::env::args().nth(3).unwrap_or_else(|| "dealer-1".to_string());
            serde_json::json!({"type":"start_game","table_id":"main","device":device})
        }
        "join" => {
            let player_id = std::env::args().nth(3).expect("player_id required for join");
            let seat_number: u8 = std::env::args().nth(4).and_then(|s| s.parse().ok()).unwrap_or(0);
            let buy_in: u64 = std::env::args().nth(5).and_then(|s| s.parse().ok()).unwrap_or(1000);
            serde_json::json!({"type":"join","table_id":"main","player_id":player_id,"seat_number":seat_number,"buy_in":buy_in})
        }
        "fold" => {
            let player_id = std::env::args().nth(3).expect("player_id required for fold");
            let seat_id = std::env::args().nth(4).expect("seat_id required for fold");
            serde_json::json!({"type":"fold","table_id":"main","player_id":player_id,"seat_id":seat_id})
        }
        "check" => {
            let player_id = std::env::args().nth(3).expect("player_id required for check");
            let seat_id = std::env::args().nth(4).expect("seat_id required for check");
            serde_json::json!({"type":"check","table_id":"main","player_id":player_id,"seat_id":seat_id})
        }
        "call" => {
            let player_id = std::env::args().nth(3).expect("player_id required for call");
            let seat_id = std::env::args().nth(4).expect("seat_id required for call");
            serde_json::json!({"type":"call","table_id":"main","player_id":player_id,"seat_id":seat_id})
        }
        "raise" => {
            let player_id = std::env::args().nth(3).expect("player_id required for raise");
            let seat_id = std::env::args().nth(4).expect("seat_id required for raise");
            let amount: u64 = std::env::args().nth(5).and_then(|s| s.parse().ok()).unwrap_or(0);
            serde_json::json!({"type":"raise","table_id":"main","player_id":player_id,"seat_id":seat_id,"amount":amount})
        }
        "all_in" => {
            let player_id = std::env::args().nth(3).expect("player_id required for all_in");
            let seat_id = std::env::args().nth(4).expect("seat_id required for all_in");
            serde_json::json!({"type":"all_in","table_id":"main","player_id":player_id,"seat_id":seat_id})
        }
        "snapshot" => {
            let viewer = std::env::args().nth(3);
            serde_json::json!({"type":"get_snapshot","table_id":"main","viewer":viewer})
        }
        other => {
            eprintln!("unknown mode {other}");
            return;
        }
    };
    ws.send(Message::Text(outgoing.to_string())).await.unwrap();

    let mut reads = 0;
    while reads < 20 {
        if let Some(Ok(msg)) = ws.next().await {
            println!("<- {msg}");
        } else {
            break;
        }
        reads += 1;
    }
}
