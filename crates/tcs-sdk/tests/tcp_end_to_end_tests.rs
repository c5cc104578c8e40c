//! TCP 端到端测试
//!
//! 在本地端口启动一个由 `Simulator` 驱动的假控制器，验证 `SessionBuilder::build`
//! 与 `ControllerConfig` 在真实 socket 上的行为。

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use tcs_sdk::control::ControllerConfig;
use tcs_sdk::prelude::*;
use tcs_sdk::transport::mock::Simulator;

/// 接受一个连接，把每一行交给模拟器并回写应答（`\r\n` 结尾）
fn spawn_controller(sim: Simulator) -> (u16, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut sim = sim;
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            sim.write_line(&line).unwrap();
            let reply = sim.read_line().unwrap();
            writer.write_all(format!("{reply}\r\n").as_bytes()).unwrap();
            if sim.has_exited() {
                break;
            }
        }
    });
    (port, handle)
}

#[test]
fn test_full_session_over_tcp() {
    let sim = Simulator::new();
    let (port, server) = spawn_controller(sim.clone());

    let session = SessionBuilder::new()
        .address("127.0.0.1")
        .port(port)
        .connect_timeout(Duration::from_secs(2))
        .read_timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let mut arm = StationDriver::new(session);

    arm.set_station(3, &Position::from([10.0, 20.0, 30.0]), CoordinateSystem::Joint)
        .unwrap();
    arm.station_move(3, 1).unwrap();
    let joints = arm.get_current_location(CoordinateSystem::Joint).unwrap();
    assert_eq!(joints, Position::from([10.0, 20.0, 30.0]));

    arm.shutdown().unwrap();
    server.join().unwrap();

    assert!(sim.has_exited());
    assert_eq!(sim.received_lines().len(), 6);
}

#[test]
fn test_config_driven_connection() {
    let sim = Simulator::new();
    let (port, server) = spawn_controller(sim.clone());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    ControllerConfig {
        address: "127.0.0.1".to_string(),
        port,
        connect_timeout_ms: Some(2000),
        read_timeout_ms: Some(5000),
        default_coordinates: CoordinateSystem::Joint,
    }
    .save(&path)
    .unwrap();

    let session = ControllerConfig::load(&path)
        .unwrap()
        .into_builder()
        .build()
        .unwrap();
    assert_eq!(session.default_coordinates(), CoordinateSystem::Joint);

    let mut arm = StationDriver::new(session);
    let goal = arm.get_goal_location(None).unwrap();
    assert_eq!(goal.coords(), &[2.0, 4.0, 2.0, 4.0, 5.0, 7.0]);

    arm.shutdown().unwrap();
    server.join().unwrap();
}

#[test]
fn test_controller_hangup_is_transport_fault() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut writer = stream;
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        writer.write_all(b"0\n").unwrap();
        // 读取下一条命令后直接断开
        line.clear();
        reader.read_line(&mut line).unwrap();
    });

    let session = SessionBuilder::new()
        .address("127.0.0.1")
        .port(port)
        .build()
        .unwrap();
    let mut arm = StationDriver::new(session);

    let err = arm.get_current_location(None).unwrap_err();
    assert_eq!(err.kind(), FailureKind::TransportFault);
    assert_eq!(arm.session().state(), SessionState::Faulted);
    server.join().unwrap();
}
