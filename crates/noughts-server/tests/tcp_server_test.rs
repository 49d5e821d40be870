//! End-to-end tests over real loopback TCP.

use std::time::Duration;

use noughts_proto::MAX_LINE_LEN;
use noughts_server::{AuthorityConfig, GameHub, Server, ServerRuntimeConfig, SystemEnv};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};

const READ_TIMEOUT: Duration = Duration::from_secs(5);

struct Player {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Player {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        Self { lines: BufReader::new(read).lines(), writer }
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(format!("{line}\n").as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> Option<String> {
        tokio::time::timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
    }

    async fn expect(&mut self, expected: &str) {
        assert_eq!(self.recv().await.as_deref(), Some(expected));
    }

    async fn skip_until(&mut self, prefix: &str) -> String {
        loop {
            let line = self.recv().await.expect("connection closed");
            if line.starts_with(prefix) {
                return line;
            }
        }
    }
}

async fn start_server(restart_delay: Duration) -> std::net::SocketAddr {
    start_server_with_hub(restart_delay).await.0
}

async fn start_server_with_hub(
    restart_delay: Duration,
) -> (std::net::SocketAddr, GameHub<SystemEnv>) {
    let config = ServerRuntimeConfig {
        bind_address: "127.0.0.1:0".to_string(),
        authority: AuthorityConfig { restart_delay },
        ..Default::default()
    };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let hub = server.hub().clone();
    tokio::spawn(server.run());
    (addr, hub)
}

/// Connect two players in seat order and consume the start sequence.
async fn seated_pair(addr: std::net::SocketAddr) -> (Player, Player) {
    let mut x = Player::connect(addr).await;
    x.expect("SIMBOLO|X").await;
    x.expect("ID_JOGADOR|1").await;

    let mut o = Player::connect(addr).await;
    o.expect("SIMBOLO|O").await;
    o.expect("ID_JOGADOR|2").await;

    for player in [&mut x, &mut o] {
        player.expect("JOGO_INICIADO|Game started! Player X moves first.").await;
        player.expect("ESTADO|-,-,-|-,-,-|-,-,-").await;
    }

    (x, o)
}

#[tokio::test]
async fn move_is_broadcast_to_both_seats() {
    let addr = start_server(Duration::from_secs(5)).await;
    let (mut x, mut o) = seated_pair(addr).await;

    x.send("JOGADA|0|0").await;

    for player in [&mut x, &mut o] {
        player.expect("MOVIMENTO|1|0|0|X").await;
        player.expect("ESTADO|X,-,-|-,-,-|-,-,-").await;
        player.expect("TURNO|2").await;
    }

    o.send("JOGADA|0|0").await;
    o.expect("RESULTADO|Invalid move! Try again.").await;

    // x saw nothing for the rejected move; its next line is the chat
    o.send("CHAT|gg").await;
    x.expect("CHAT|2: gg").await;
    o.expect("CHAT|2: gg").await;
}

#[tokio::test]
async fn malformed_line_keeps_connection_open() {
    let addr = start_server(Duration::from_secs(5)).await;
    let (mut x, _o) = seated_pair(addr).await;

    x.send("JOGADA|a|b").await;
    x.expect("RESULTADO|Invalid move format!").await;

    x.send("OLA").await;
    x.expect("RESULTADO|Unknown command: OLA").await;

    x.send("JOGADA|1|1\r").await;
    x.expect("MOVIMENTO|1|1|1|X").await;
}

#[tokio::test]
async fn third_connection_is_turned_away() {
    let (addr, hub) = start_server_with_hub(Duration::from_secs(5)).await;
    let (_x, _o) = seated_pair(addr).await;

    let mut third = Player::connect(addr).await;
    third.expect("SERVIDOR_CHEIO|Server is full. Try again later.").await;
    assert_eq!(third.recv().await, None);

    // the refused session is detached before its notice is even written
    assert_eq!(hub.session_count().await, 2);
}

#[tokio::test]
async fn departure_interrupts_game() {
    let addr = start_server(Duration::from_secs(5)).await;
    let (mut x, o) = seated_pair(addr).await;

    drop(o);
    x.expect("JOGADOR_SAIU|A player left. Game interrupted.").await;

    x.send("JOGADA|0|0").await;
    x.expect("RESULTADO|No game in progress.").await;
}

#[tokio::test]
async fn finished_game_restarts_after_delay() {
    let addr = start_server(Duration::from_millis(100)).await;
    let (mut x, mut o) = seated_pair(addr).await;

    for (seat, row, col) in [(1, 0, 0), (2, 1, 0), (1, 0, 1), (2, 1, 1), (1, 0, 2)] {
        let player = if seat == 1 { &mut x } else { &mut o };
        player.send(&format!("JOGADA|{row}|{col}")).await;
        // moves arrive on different sockets; wait for the echo to keep order
        player.skip_until(&format!("MOVIMENTO|{seat}|{row}|{col}|")).await;
    }

    for player in [&mut x, &mut o] {
        assert_eq!(player.skip_until("FIM_JOGO|").await, "FIM_JOGO|Player X wins!");

        player.expect("JOGO_INICIADO|Game started! Player X moves first.").await;
        player.expect("ESTADO|-,-,-|-,-,-|-,-,-").await;
    }
}

#[tokio::test]
async fn chat_burst_larger_than_queue_keeps_both_seats() {
    let (addr, hub) = start_server_with_hub(Duration::from_secs(5)).await;
    let (mut x, mut o) = seated_pair(addr).await;

    let burst = 8 * ServerRuntimeConfig::default().outbound_queue;
    o.send(&vec!["CHAT|hi"; burst].join("\n")).await;

    for player in [&mut x, &mut o] {
        for _ in 0..burst {
            player.expect("CHAT|2: hi").await;
        }
    }
    assert_eq!(hub.session_count().await, 2);

    x.send("JOGADA|1|1").await;
    o.expect("MOVIMENTO|1|1|1|X").await;
}

#[tokio::test]
async fn overlong_line_drops_the_sender() {
    let (addr, hub) = start_server_with_hub(Duration::from_secs(5)).await;
    let (x, mut o) = seated_pair(addr).await;
    let Player { mut lines, mut writer } = x;

    // the peer may reset before all of it is written
    let _ = writer.write_all(&vec![b'a'; 2 * MAX_LINE_LEN]).await;

    let closed = tokio::time::timeout(READ_TIMEOUT, async {
        loop {
            match lines.next_line().await {
                Ok(Some(_)) => continue,
                Ok(None) | Err(_) => return,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "server kept reading past the line limit");

    o.expect("JOGADOR_SAIU|A player left. Game interrupted.").await;
    assert_eq!(hub.session_count().await, 1);
}
