use naval_duel::protocol::read_object;
use naval_duel::{
    Coordinate, Handshake, Orientation, PlayerId, ProtocolError, ResolvedShot, Ship, ShotStatus,
    TurnRequest, TurnResponse,
};
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn test_handshake_over_stream() {
    let (mut a, mut b) = duplex(64 * 1024);
    let handshake = Handshake {
        own_fleet: vec![Ship::placed(1, Orientation::Horizontal, 2, 1).unwrap()],
        opponent_fleet: vec![Ship::placed(1, Orientation::Vertical, 1, 2).unwrap()],
        dimension: 1,
        player: PlayerId::Second,
    };
    handshake.write_to(&mut a).await.unwrap();
    let received = Handshake::read_from(&mut b).await.unwrap();
    assert_eq!(received, handshake);
    assert_eq!(received.own_fleet[0].coordinates()[0].to_string(), "A2");
}

#[tokio::test]
async fn test_turn_request_layout() {
    let (mut a, mut b) = duplex(1024);
    let request = TurnRequest::new(PlayerId::Second, "C5".parse::<Coordinate>().unwrap());
    request.write_to(&mut a).await.unwrap();
    drop(a);

    let mut raw = Vec::new();
    b.read_to_end(&mut raw).await.unwrap();
    assert_eq!(&raw[..4], &2i32.to_be_bytes());
    let len = u32::from_be_bytes(raw[4..8].try_into().unwrap()) as usize;
    assert_eq!(raw.len(), 8 + len);
    let coordinate: String = bincode::deserialize(&raw[8..]).unwrap();
    assert_eq!(coordinate, "C5");
}

#[tokio::test]
async fn test_invalid_response_is_status_only() {
    let (mut a, mut b) = duplex(1024);
    TurnResponse::Invalid.write_to(&mut a).await.unwrap();
    drop(a);

    let mut raw = Vec::new();
    b.read_to_end(&mut raw).await.unwrap();
    assert_eq!(raw, 0i32.to_be_bytes());

    let response = TurnResponse::read_from(&mut raw.as_slice()).await.unwrap();
    assert_eq!(response, TurnResponse::Invalid);
}

#[tokio::test]
async fn test_resolved_response_over_stream() {
    let (mut a, mut b) = duplex(64 * 1024);
    let response = TurnResponse::Resolved(ResolvedShot {
        status: ShotStatus::Missed,
        ship: None,
        previous: Some("A1".parse().unwrap()),
        previous_hit: true,
        target_health: 66,
        firing_health: 100,
        log: "SECOND PLAYER: B2 (MISSED)\nFIRST PLAYER: A1 (HIT)".to_string(),
    });
    response.write_to(&mut a).await.unwrap();
    let received = TurnResponse::read_from(&mut b).await.unwrap();
    assert_eq!(received, response);
    assert_eq!(received.status(), ShotStatus::Missed);
}

#[tokio::test]
async fn test_oversized_frame_rejected() {
    let (mut a, mut b) = duplex(1024);
    a.write_u32(20_000_000).await.unwrap();
    let err = read_object::<_, String>(&mut b).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { len: 20_000_000, .. }));
}

#[tokio::test]
async fn test_empty_frame_rejected() {
    let (mut a, mut b) = duplex(1024);
    a.write_u32(0).await.unwrap();
    let err = read_object::<_, String>(&mut b).await.unwrap_err();
    assert!(matches!(err, ProtocolError::EmptyFrame));
}

#[tokio::test]
async fn test_unknown_status_rejected() {
    let raw = 7i32.to_be_bytes();
    let err = TurnResponse::read_from(&mut raw.as_slice()).await.unwrap_err();
    assert!(matches!(err, ProtocolError::UnknownStatus(7)));
}

#[tokio::test]
async fn test_truncated_request_is_disconnect() {
    let (mut a, mut b) = duplex(1024);
    a.write_i32(2).await.unwrap();
    drop(a);
    let err = TurnRequest::read_from(&mut b).await.unwrap_err();
    assert!(err.is_disconnect());
}

#[tokio::test]
async fn test_handshake_dimension_out_of_range() {
    for dimension in [0u32, 14, 40] {
        let (mut a, mut b) = duplex(64 * 1024);
        let handshake = Handshake {
            own_fleet: Vec::new(),
            opponent_fleet: Vec::new(),
            dimension,
            player: PlayerId::First,
        };
        handshake.write_to(&mut a).await.unwrap();
        let err = Handshake::read_from(&mut b).await.unwrap_err();
        assert!(
            matches!(err, ProtocolError::InvalidDimension(d) if d == dimension as i32),
            "dimension {dimension}: {err}"
        );
    }
}

#[test]
fn test_render_fleet_clamps_dimension() {
    let ships = vec![Ship::placed(1, Orientation::Horizontal, 1, 1).unwrap()];
    let board = naval_duel::render_fleet(&ships, 40);
    assert_eq!(board.lines().count(), 27);
    assert!(board.lines().next().unwrap().ends_with('Z'));
}
