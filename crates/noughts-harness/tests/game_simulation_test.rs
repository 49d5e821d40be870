//! Full-stack game scenarios over simulated TCP.
//!
//! Both players live in one turmoil client so their actions happen in a
//! fixed order; every scenario replays identically.

use std::{error::Error, time::Duration};

use noughts_harness::{SimPlayer, SimServer};
use noughts_proto::{BoardState, ClientMessage, Mark, SeatId, ServerMessage, Tag};
use noughts_server::{AuthorityConfig, notice};

const SERVER_ADDR: &str = "server:12345";

fn simulation() -> turmoil::Sim<'static> {
    let mut sim =
        turmoil::Builder::new().simulation_duration(Duration::from_secs(120)).build();

    sim.host("server", || async {
        SimServer::bind("0.0.0.0:12345").await?.run().await?;
        Ok(())
    });

    sim
}

/// Seat two players and consume the start sequence on both.
async fn seated_pair() -> Result<(SimPlayer, SimPlayer), Box<dyn Error>> {
    let mut x = SimPlayer::connect(SERVER_ADDR).await?;
    assert_eq!(x.recv().await, Some(ServerMessage::Symbol(Mark::X)));
    assert_eq!(x.recv().await, Some(ServerMessage::PlayerId(SeatId::new(1))));

    let mut o = SimPlayer::connect(SERVER_ADDR).await?;
    assert_eq!(o.recv().await, Some(ServerMessage::Symbol(Mark::O)));
    assert_eq!(o.recv().await, Some(ServerMessage::PlayerId(SeatId::new(2))));

    for player in [&mut x, &mut o] {
        assert_eq!(
            player.recv().await,
            Some(ServerMessage::GameStarted(notice::GAME_STARTED.to_string()))
        );
        assert_eq!(player.recv().await, Some(ServerMessage::State(BoardState::EMPTY)));
    }

    Ok((x, o))
}

/// Play `moves` alternately starting with X, waiting for each echo.
async fn play_out(
    x: &mut SimPlayer,
    o: &mut SimPlayer,
    moves: &[(i32, i32)],
) -> Result<(), Box<dyn Error>> {
    for (i, &(row, col)) in moves.iter().enumerate() {
        let mover = if i % 2 == 0 { &*x } else { &*o };
        mover.play(row, col).await?;

        for player in [&mut *x, &mut *o] {
            let echo = player.recv_tag(Tag::MoveMade).await;
            assert!(
                matches!(echo, Some(ServerMessage::MoveMade { row: r, col: c, .. })
                    if i32::from(r) == row && i32::from(c) == col),
                "unexpected echo {echo:?} for ({row}, {col})"
            );
        }
    }

    Ok(())
}

#[test]
fn pairing_starts_game_with_x_to_move() {
    let mut sim = simulation();

    sim.client("players", async {
        let (x, o) = seated_pair().await?;

        assert_eq!(x.state().mark(), Some(Mark::X));
        assert_eq!(x.state().seat(), Some(SeatId::new(1)));
        assert!(x.state().my_turn());

        assert_eq!(o.state().mark(), Some(Mark::O));
        assert_eq!(o.state().seat(), Some(SeatId::new(2)));
        assert!(!o.state().my_turn());

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn move_is_broadcast_and_turn_passes() {
    let mut sim = simulation();

    sim.client("players", async {
        let (mut x, mut o) = seated_pair().await?;

        x.play(1, 1).await?;

        let after = BoardState::decode("-,-,-|-,X,-|-,-,-")?;
        for player in [&mut x, &mut o] {
            assert_eq!(
                player.recv().await,
                Some(ServerMessage::MoveMade { seat: SeatId::new(1), row: 1, col: 1, mark: Mark::X })
            );
            assert_eq!(player.recv().await, Some(ServerMessage::State(after)));
            assert_eq!(player.recv().await, Some(ServerMessage::Turn(SeatId::new(2))));
            assert_eq!(player.state().board(), &after);
        }

        assert!(!x.state().my_turn());
        assert!(o.state().my_turn());

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn rejected_moves_reach_only_the_sender() {
    let mut sim = simulation();

    sim.client("players", async {
        let (mut x, mut o) = seated_pair().await?;

        o.play(0, 0).await?;
        assert_eq!(o.recv().await, Some(ServerMessage::Result(notice::NOT_YOUR_TURN.to_string())));

        x.play(3, 0).await?;
        assert_eq!(x.recv().await, Some(ServerMessage::Result(notice::INVALID_MOVE.to_string())));

        x.play(0, 0).await?;
        o.recv_tag(Tag::Turn).await;
        o.play(0, 0).await?;
        assert_eq!(o.recv().await, Some(ServerMessage::Result(notice::INVALID_MOVE.to_string())));

        // the only notice x ever got was its own rejection
        o.send(ClientMessage::Chat { text: "oops".to_string() }).await?;
        assert_eq!(x.recv_tag(Tag::Turn).await, Some(ServerMessage::Turn(SeatId::new(2))));
        assert_eq!(
            x.recv().await,
            Some(ServerMessage::Chat { seat: SeatId::new(2), text: "oops".to_string() })
        );
        let notices: Vec<_> = x.received().iter().filter(|m| m.tag() == Tag::Result).collect();
        assert_eq!(notices, [&ServerMessage::Result(notice::INVALID_MOVE.to_string())]);

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn win_ends_game_and_restart_follows_delay() {
    let mut sim = simulation();
    let delay = AuthorityConfig::default().restart_delay;

    sim.client("players", async move {
        let (mut x, mut o) = seated_pair().await?;

        play_out(&mut x, &mut o, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]).await?;

        for player in [&mut x, &mut o] {
            assert_eq!(
                player.recv_tag(Tag::GameOver).await,
                Some(ServerMessage::GameOver(notice::win(Mark::X)))
            );
            assert!(!player.state().my_turn());
        }

        let finished = tokio::time::Instant::now();
        for player in [&mut x, &mut o] {
            assert_eq!(
                player.recv().await,
                Some(ServerMessage::GameStarted(notice::GAME_STARTED.to_string()))
            );
            assert_eq!(player.recv().await, Some(ServerMessage::State(BoardState::EMPTY)));
            assert_eq!(player.state().board(), &BoardState::EMPTY);
        }
        assert!(finished.elapsed() >= delay - Duration::from_millis(100));
        assert!(x.state().my_turn());

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn full_board_is_a_draw() {
    let mut sim = simulation();

    sim.client("players", async {
        let (mut x, mut o) = seated_pair().await?;

        let moves = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (2, 2), (1, 2), (2, 0), (2, 1)];
        play_out(&mut x, &mut o, &moves).await?;

        let full = BoardState::decode("X,O,X|O,X,X|O,X,O")?;
        for player in [&mut x, &mut o] {
            assert_eq!(player.recv().await, Some(ServerMessage::State(full)));
            assert_eq!(player.recv().await, Some(ServerMessage::GameOver(notice::DRAW.to_string())));
        }

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn third_connection_is_turned_away() {
    let mut sim = simulation();

    sim.client("players", async {
        let (_x, _o) = seated_pair().await?;

        let mut third = SimPlayer::connect(SERVER_ADDR).await?;
        assert!(third.recv_eof().await, "server kept the third connection open");
        assert_eq!(
            third.received(),
            &[ServerMessage::ServerFull(notice::SERVER_FULL.to_string())]
        );
        assert_eq!(third.state().seat(), None);

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn departure_interrupts_game_and_new_player_restarts_it() {
    let mut sim = simulation();

    sim.client("players", async {
        let (mut x, mut o) = seated_pair().await?;

        x.play(0, 0).await?;
        o.recv_tag(Tag::Turn).await;
        o.disconnect().await;

        assert_eq!(
            x.recv_tag(Tag::PlayerLeft).await,
            Some(ServerMessage::PlayerLeft(notice::PLAYER_LEFT.to_string()))
        );

        x.play(1, 1).await?;
        assert_eq!(x.recv().await, Some(ServerMessage::Result(notice::NOT_IN_PROGRESS.to_string())));

        // the freed seat goes to the next arrival and a fresh game begins
        let mut replacement = SimPlayer::connect(SERVER_ADDR).await?;
        assert_eq!(replacement.recv().await, Some(ServerMessage::Symbol(Mark::O)));
        assert_eq!(replacement.recv().await, Some(ServerMessage::PlayerId(SeatId::new(2))));

        for player in [&mut x, &mut replacement] {
            assert_eq!(
                player.recv().await,
                Some(ServerMessage::GameStarted(notice::GAME_STARTED.to_string()))
            );
            assert_eq!(player.recv().await, Some(ServerMessage::State(BoardState::EMPTY)));
        }

        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn departure_after_game_over_cancels_restart() {
    let mut sim = simulation();
    let delay = AuthorityConfig::default().restart_delay;

    sim.client("players", async move {
        let (mut x, mut o) = seated_pair().await?;

        play_out(&mut x, &mut o, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]).await?;
        x.recv_tag(Tag::GameOver).await;
        o.recv_tag(Tag::GameOver).await;
        o.disconnect().await;

        // nothing arrives once the delay has passed: no restart for one seat
        tokio::time::sleep(delay * 2).await;
        x.send(ClientMessage::Chat { text: "anyone?".to_string() }).await?;
        assert_eq!(
            x.recv().await,
            Some(ServerMessage::Chat { seat: SeatId::new(1), text: "anyone?".to_string() })
        );
        assert!(!x.received().iter().any(|m| m.tag() == Tag::PlayerLeft));
        assert_eq!(
            x.received().iter().filter(|m| m.tag() == Tag::GameStarted).count(),
            1
        );

        Ok(())
    });

    sim.run().expect("simulation failed");
}
