//! Station Driver：工位、运动与托盘操作
//!
//! 全部操作都建立在 [`Session::send`] 之上，不直接访问传输。
//! 每个方法返回 [`CommandResult`]，控制器上报的失败以数据形式返回，不会 panic。

use tcs_driver::{CommandError, CommandResult, DriverError, Session, SessionConfig};
use tcs_protocol::{Command, CoordinateSystem, Position, command};
use tcs_transport::LineTransport;
use tracing::{debug, warn};

use crate::types::{DEFAULT_Z_CLEARANCE, GripOptions, ProfileIndex, StationIndex};

/// 工位级操作接口
///
/// # Example
///
/// ```rust,no_run
/// use tcs_client::{GripOptions, StationDriver};
/// use tcs_driver::SessionBuilder;
/// use tcs_protocol::{CoordinateSystem, Position};
///
/// let session = SessionBuilder::new().address("192.168.0.1").build()?;
/// let mut arm = StationDriver::new(session);
///
/// arm.set_station(1, &Position::from([4.0, 8.0, 4.0]), CoordinateSystem::Joint)?;
/// arm.station_move(1, 1)?;
/// arm.move_plate(2, 5, GripOptions::default())?;
/// let here = arm.get_current_location(None)?;
/// println!("current: {here}");
/// arm.shutdown()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StationDriver<T: LineTransport> {
    session: Session<T>,
}

impl<T: LineTransport> StationDriver<T> {
    pub fn new(session: Session<T>) -> Self {
        Self { session }
    }

    /// 在给定传输上 attach 并创建驱动
    pub fn open(transport: T, config: SessionConfig) -> Result<Self, DriverError> {
        Session::open(transport, config).map(Self::new)
    }

    // ==================== 会话生命周期 ====================

    pub fn attach(&mut self) -> CommandResult {
        self.session.attach()
    }

    pub fn release(&mut self) -> CommandResult {
        self.session.release()
    }

    pub fn shutdown(&mut self) -> CommandResult {
        self.session.shutdown()
    }

    // ==================== 工位 ====================

    /// 设置工位坐标
    ///
    /// 笛卡尔坐标编码为 `locXyz`，关节坐标编码为 `locAngles`。
    /// `system` 为 `None` 时使用 Session 的默认坐标系。
    pub fn set_station(
        &mut self,
        station: impl Into<StationIndex>,
        position: &Position,
        system: impl Into<Option<CoordinateSystem>>,
    ) -> CommandResult {
        let system = self.resolve(system.into());
        let station = station.into();
        debug!("Setting station {} ({}) to {}", station, system, position);
        self.session
            .send(command::set_location(system, station.get(), position))
    }

    /// 以指定运动参数移动到工位：`Move <ix> <profile>`
    pub fn station_move(
        &mut self,
        station: impl Into<StationIndex>,
        profile: impl Into<ProfileIndex>,
    ) -> CommandResult {
        self.session
            .send(command::station_move(station.into().get(), profile.into().get()))
    }

    /// 查询当前位置（`wherec` / `wherej`）
    ///
    /// 坐标按 `f64` 解析，`1.5`、`1e3` 这类非整数 token 也会被接受，
    /// 而不是只接受整数。非数字、非有限值，或笛卡尔应答不是 6 个坐标时
    /// 返回 [`CommandError::MalformedResponse`]。
    pub fn get_current_location(
        &mut self,
        system: impl Into<Option<CoordinateSystem>>,
    ) -> CommandResult<Position> {
        let system = self.resolve(system.into());
        self.query_location(system, command::current_location(system))
    }

    /// 查询目标位置（`DestC` / `DestJ`），解析规则同 [`Self::get_current_location`]
    pub fn get_goal_location(
        &mut self,
        system: impl Into<Option<CoordinateSystem>>,
    ) -> CommandResult<Position> {
        let system = self.resolve(system.into());
        self.query_location(system, command::goal_location(system))
    }

    fn query_location(
        &mut self,
        system: CoordinateSystem,
        command: Command,
    ) -> CommandResult<Position> {
        let response = self.session.request(command.clone())?;
        Position::from_reply(system, response.fields()).map_err(|reason| {
            warn!("Unusable location reply to `{}`: {}", command, reason);
            CommandError::MalformedResponse {
                command,
                raw: response.line().to_string(),
                reason,
            }
        })
    }

    fn resolve(&self, system: Option<CoordinateSystem>) -> CoordinateSystem {
        system.unwrap_or_else(|| self.session.default_coordinates())
    }

    // ==================== 托盘 ====================

    /// 以默认安全高度（50）示教托盘
    pub fn teach_plate(&mut self, station: impl Into<StationIndex>) -> CommandResult {
        self.teach_plate_with_clearance(station, DEFAULT_Z_CLEARANCE)
    }

    pub fn teach_plate_with_clearance(
        &mut self,
        station: impl Into<StationIndex>,
        z_clearance: i32,
    ) -> CommandResult {
        self.session
            .send(command::teach_plate(station.into().get(), z_clearance))
    }

    pub fn pick_plate(
        &mut self,
        station: impl Into<StationIndex>,
        grip: GripOptions,
    ) -> CommandResult {
        self.session.send(command::pick_plate(
            station.into().get(),
            grip.horizontal_compliance,
            grip.compliance_torque,
        ))
    }

    pub fn place_plate(
        &mut self,
        station: impl Into<StationIndex>,
        grip: GripOptions,
    ) -> CommandResult {
        self.session.send(command::place_plate(
            station.into().get(),
            grip.horizontal_compliance,
            grip.compliance_torque,
        ))
    }

    /// 从 `from` 抓取托盘并放置到 `to`
    ///
    /// 抓取失败时直接返回该失败，不会尝试放置。
    ///
    /// **注意**：没有回滚机制。抓取成功而放置失败时，托盘仍在夹爪中，
    /// 返回的是放置的失败，且不会发送任何补偿命令，需要调用方在更高层处理。
    pub fn move_plate(
        &mut self,
        from: impl Into<StationIndex>,
        to: impl Into<StationIndex>,
        grip: GripOptions,
    ) -> CommandResult {
        let (from, to) = (from.into(), to.into());
        self.pick_plate(from, grip)?;
        self.place_plate(to, grip).inspect_err(|e| {
            warn!(
                "Plate picked from station {} but placing at {} failed, plate is still held: {}",
                from, to, e
            );
        })
    }

    // ==================== 访问器 ====================

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// 发送任意原始命令（仍受会话状态约束）
    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<T> {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcs_driver::{FailureKind, SessionState};
    use tcs_transport::mock::ScriptedTransport;

    fn driver_with(
        replies: &[&str],
        default_coordinates: CoordinateSystem,
    ) -> (StationDriver<ScriptedTransport>, ScriptedTransport) {
        let mut all = vec!["0"];
        all.extend_from_slice(replies);
        let handle = ScriptedTransport::with_replies(all);
        let config = SessionConfig { default_coordinates };
        let driver = StationDriver::open(handle.clone(), config).unwrap();
        handle.take_sent_lines();
        (driver, handle)
    }

    #[test]
    fn test_set_station_joint_encoding() {
        let (mut arm, handle) = driver_with(&["0 1"], CoordinateSystem::Cartesian);
        let fields = arm
            .set_station(1, &Position::from([4.0, 8.0, 4.0]), CoordinateSystem::Joint)
            .unwrap();
        assert_eq!(fields, vec!["1"]);
        assert_eq!(handle.sent_lines(), vec!["locAngles 1 4 8 4"]);
    }

    #[test]
    fn test_set_station_uses_default_system() {
        let (mut arm, handle) = driver_with(&["0"], CoordinateSystem::Cartesian);
        let pos = Position::from([1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
        arm.set_station(0, &pos, None).unwrap();

        let (mut arm_j, handle_j) = driver_with(&["0"], CoordinateSystem::Joint);
        arm_j.set_station(0, &pos, None).unwrap();

        assert_eq!(handle.sent_lines(), vec!["locXyz 0 1 2 3 1 2 3"]);
        assert_eq!(handle_j.sent_lines(), vec!["locAngles 0 1 2 3 1 2 3"]);
    }

    #[test]
    fn test_station_move() {
        let (mut arm, handle) = driver_with(&["0"], CoordinateSystem::Cartesian);
        arm.station_move(3, ProfileIndex(2)).unwrap();
        assert_eq!(handle.sent_lines(), vec!["Move 3 2"]);
    }

    #[test]
    fn test_get_current_location_cartesian() {
        let (mut arm, handle) = driver_with(&["0 0 0 0 1 4 3"], CoordinateSystem::Joint);
        let pos = arm
            .get_current_location(CoordinateSystem::Cartesian)
            .unwrap();
        assert_eq!(pos, Position::from([0.0, 0.0, 0.0, 1.0, 4.0, 3.0]));
        assert_eq!(handle.sent_lines(), vec!["wherec"]);
    }

    #[test]
    fn test_get_goal_location_joint() {
        let (mut arm, handle) = driver_with(&["0 2 4 2 4 5 7"], CoordinateSystem::Cartesian);
        let pos = arm.get_goal_location(CoordinateSystem::Joint).unwrap();
        assert_eq!(pos.coords(), &[2.0, 4.0, 2.0, 4.0, 5.0, 7.0]);
        assert_eq!(handle.sent_lines(), vec!["DestJ"]);
    }

    #[test]
    fn test_location_with_non_numeric_field_is_malformed() {
        let (mut arm, _handle) = driver_with(&["0 1 two 3 4 5 6"], CoordinateSystem::Cartesian);
        let err = arm.get_current_location(None).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
        assert_eq!(err.raw(), Some("0 1 two 3 4 5 6"));
        assert_eq!(err.command().to_string(), "wherec");
    }

    #[test]
    fn test_cartesian_location_with_wrong_count_is_malformed() {
        let (mut arm, _handle) =
            driver_with(&["0 1 2 3", "0 1 2 3 4 5 6 7"], CoordinateSystem::Cartesian);

        let short = arm.get_current_location(None).unwrap_err();
        assert_eq!(short.kind(), FailureKind::MalformedResponse);
        assert_eq!(short.raw(), Some("0 1 2 3"));
        assert_eq!(short.command().to_string(), "wherec");

        let long = arm.get_goal_location(None).unwrap_err();
        assert_eq!(long.kind(), FailureKind::MalformedResponse);
        assert_eq!(long.command().to_string(), "DestC");
        assert!(arm.session().is_attached());
    }

    #[test]
    fn test_joint_location_accepts_any_count() {
        let (mut arm, _handle) = driver_with(&["0 4 8 4"], CoordinateSystem::Cartesian);
        let joints = arm.get_current_location(CoordinateSystem::Joint).unwrap();
        assert_eq!(joints.coords(), &[4.0, 8.0, 4.0]);
    }

    #[test]
    fn test_status_beyond_i32_is_rejection() {
        let (mut arm, _handle) = driver_with(&["-2147483649"], CoordinateSystem::Cartesian);
        let err = arm.station_move(1, 1).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ControllerRejected);
        assert_eq!(err.raw(), Some("-2147483649"));
    }

    #[test]
    fn test_location_rejected() {
        let (mut arm, _handle) = driver_with(&["-1"], CoordinateSystem::Cartesian);
        let err = arm.get_goal_location(None).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ControllerRejected);
    }

    #[test]
    fn test_plate_commands() {
        let (mut arm, handle) = driver_with(&["0", "0", "0", "0"], CoordinateSystem::Cartesian);
        arm.teach_plate(2).unwrap();
        arm.teach_plate_with_clearance(2, 80).unwrap();
        arm.pick_plate(2, GripOptions::default()).unwrap();
        arm.place_plate(2, GripOptions::compliant(30)).unwrap();
        assert_eq!(
            handle.sent_lines(),
            vec![
                "TeachPlate 2 50",
                "TeachPlate 2 80",
                "PickPlate 2 0 0",
                "PlacePlate 2 1 30",
            ]
        );
    }

    #[test]
    fn test_move_plate_returns_place_failure_without_compensation() {
        let (mut arm, handle) = driver_with(&["0", "-1"], CoordinateSystem::Cartesian);
        let err = arm.move_plate(2, 5, GripOptions::default()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ControllerRejected);
        assert_eq!(err.command().to_string(), "PlacePlate 5 0 0");
        assert_eq!(handle.sent_lines(), vec!["PickPlate 2 0 0", "PlacePlate 5 0 0"]);
        assert_eq!(handle.pending_replies(), 0);
    }

    #[test]
    fn test_move_plate_stops_after_pick_failure() {
        let (mut arm, handle) = driver_with(&["-1", "0"], CoordinateSystem::Cartesian);
        let err = arm.move_plate(2, 5, GripOptions::compliant(10)).unwrap_err();
        assert_eq!(err.command().to_string(), "PickPlate 2 1 10");
        assert_eq!(handle.sent_lines(), vec!["PickPlate 2 1 10"]);
    }

    #[test]
    fn test_operations_refused_after_release() {
        let (mut arm, handle) = driver_with(&["0"], CoordinateSystem::Cartesian);
        arm.release().unwrap();
        assert_eq!(arm.session().state(), SessionState::Released);

        let err = arm.station_move(1, 1).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidSessionState);
        assert_eq!(handle.sent_lines(), vec!["attach 0"]);
    }
}
