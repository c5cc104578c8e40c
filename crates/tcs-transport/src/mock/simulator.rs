use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use tracing::trace;

use super::lock;
use crate::{LineTransport, TransportError, check_outgoing};

const OK: &str = "0";
const REJECT: &str = "-1";

/// 模拟器中保存的工位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimStation {
    /// `true` 表示由 `locXyz` 写入，`false` 表示由 `locAngles` 写入
    pub cartesian: bool,
    pub coords: Vec<String>,
}

#[derive(Debug)]
struct SimState {
    attached: bool,
    exited: bool,
    stations: BTreeMap<i64, SimStation>,
    profiles: BTreeSet<i64>,
    current_cartesian: Vec<String>,
    current_joint: Vec<String>,
    dest_cartesian: Vec<String>,
    dest_joint: Vec<String>,
    holding_plate: bool,
    reject_prefixes: Vec<String>,
    pending: VecDeque<String>,
    log: Vec<String>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            attached: false,
            exited: false,
            stations: BTreeMap::new(),
            profiles: BTreeSet::from([1]),
            current_cartesian: tokens(&[0, 0, 0, 1, 4, 3]),
            current_joint: tokens(&[0, 0, 0, 0, 0, 0]),
            dest_cartesian: tokens(&[0, 0, 0, 1, 4, 3]),
            dest_joint: tokens(&[2, 4, 2, 4, 5, 7]),
            holding_plate: false,
            reject_prefixes: Vec::new(),
            pending: VecDeque::new(),
            log: Vec::new(),
        }
    }
}

fn tokens(values: &[i32]) -> Vec<String> {
    values.iter().map(i32::to_string).collect()
}

fn with_status(fields: &[String]) -> String {
    let mut reply = OK.to_string();
    for f in fields {
        reply.push(' ');
        reply.push_str(f);
    }
    reply
}

impl SimState {
    fn handle(&mut self, line: &str) -> String {
        if self.reject_prefixes.iter().any(|p| line.starts_with(p.as_str())) {
            return REJECT.to_string();
        }

        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, rest)) = args.split_first() else {
            return REJECT.to_string();
        };

        match name {
            "attach" => match rest {
                ["1"] => {
                    self.attached = true;
                    OK.to_string()
                },
                ["0"] => {
                    self.attached = false;
                    OK.to_string()
                },
                _ => REJECT.to_string(),
            },
            "exit" if rest.is_empty() => {
                self.exited = true;
                OK.to_string()
            },
            _ if !self.attached => REJECT.to_string(),
            "locXyz" => self.set_station(rest, true),
            "locAngles" => self.set_station(rest, false),
            "Move" => self.station_move(rest),
            "wherec" if rest.is_empty() => with_status(&self.current_cartesian),
            "wherej" if rest.is_empty() => with_status(&self.current_joint),
            "DestC" if rest.is_empty() => with_status(&self.dest_cartesian),
            "DestJ" if rest.is_empty() => with_status(&self.dest_joint),
            "TeachPlate" => match rest {
                [ix, z] if self.known_station(ix) && z.parse::<i64>().is_ok() => OK.to_string(),
                _ => REJECT.to_string(),
            },
            "PickPlate" => self.grip(rest, true),
            "PlacePlate" => self.grip(rest, false),
            _ => REJECT.to_string(),
        }
    }

    fn known_station(&self, ix: &str) -> bool {
        ix.parse::<i64>().is_ok_and(|ix| self.stations.contains_key(&ix))
    }

    fn set_station(&mut self, rest: &[&str], cartesian: bool) -> String {
        let Some((ix, coords)) = rest.split_first() else {
            return REJECT.to_string();
        };
        let Ok(index) = ix.parse::<i64>() else {
            return REJECT.to_string();
        };
        let shape_ok = if cartesian {
            coords.len() == 6
        } else {
            !coords.is_empty()
        };
        if !shape_ok || coords.iter().any(|c| c.parse::<f64>().is_err()) {
            return REJECT.to_string();
        }

        self.stations.insert(
            index,
            SimStation {
                cartesian,
                coords: coords.iter().map(|c| c.to_string()).collect(),
            },
        );
        format!("{OK} {index}")
    }

    fn station_move(&mut self, rest: &[&str]) -> String {
        let [ix, profile] = rest else {
            return REJECT.to_string();
        };
        let (Ok(ix), Ok(profile)) = (ix.parse::<i64>(), profile.parse::<i64>()) else {
            return REJECT.to_string();
        };
        if !self.profiles.contains(&profile) {
            return REJECT.to_string();
        }
        let Some(station) = self.stations.get(&ix).cloned() else {
            return REJECT.to_string();
        };

        if station.cartesian {
            self.current_cartesian = station.coords.clone();
            self.dest_cartesian = station.coords;
        } else {
            self.current_joint = station.coords.clone();
            self.dest_joint = station.coords;
        }
        OK.to_string()
    }

    fn grip(&mut self, rest: &[&str], pick: bool) -> String {
        let [ix, compliance, torque] = rest else {
            return REJECT.to_string();
        };
        let valid = self.known_station(ix)
            && matches!(*compliance, "0" | "1")
            && torque.parse::<i64>().is_ok();
        if !valid || self.holding_plate == pick {
            return REJECT.to_string();
        }
        self.holding_plate = pick;
        OK.to_string()
    }
}

/// 有状态的控制器模拟器
///
/// 默认状态：未 attach，运动参数 1 存在，当前笛卡尔位置 `0 0 0 1 4 3`，
/// 目标关节位置 `2 4 2 4 5 7`，手中无托盘。
/// 未知命令和非法参数一律应答 `-1`；未 attach 时除 `attach`/`exit` 外的命令也应答 `-1`。
/// 收到 `exit` 后连接视为关闭。
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    state: Arc<Mutex<SimState>>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 对以 `prefix` 开头的命令强制应答 `-1`
    pub fn reject_prefix(&self, prefix: impl Into<String>) {
        lock(&self.state).reject_prefixes.push(prefix.into());
    }

    pub fn add_profile(&self, profile: i64) {
        lock(&self.state).profiles.insert(profile);
    }

    pub fn set_current_location(&self, cartesian: bool, coords: &[i32]) {
        let mut state = lock(&self.state);
        if cartesian {
            state.current_cartesian = tokens(coords);
        } else {
            state.current_joint = tokens(coords);
        }
    }

    /// 直接覆盖当前位置的原始 token（可用于构造非法应答）
    pub fn set_current_tokens(&self, cartesian: bool, coords: &[&str]) {
        let coords = coords.iter().map(|c| c.to_string()).collect();
        let mut state = lock(&self.state);
        if cartesian {
            state.current_cartesian = coords;
        } else {
            state.current_joint = coords;
        }
    }

    pub fn station(&self, index: i64) -> Option<SimStation> {
        lock(&self.state).stations.get(&index).cloned()
    }

    pub fn station_count(&self) -> usize {
        lock(&self.state).stations.len()
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.state).attached
    }

    pub fn has_exited(&self) -> bool {
        lock(&self.state).exited
    }

    pub fn holding_plate(&self) -> bool {
        lock(&self.state).holding_plate
    }

    /// 收到的所有命令行
    pub fn received_lines(&self) -> Vec<String> {
        lock(&self.state).log.clone()
    }
}

impl LineTransport for Simulator {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        check_outgoing(line)?;
        let mut state = lock(&self.state);
        if state.exited {
            return Err(TransportError::Closed);
        }
        state.log.push(line.to_string());
        let reply = state.handle(line);
        trace!("sim: {:?} -> {:?}", line, reply);
        state.pending.push_back(reply);
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        lock(&self.state).pending.pop_front().ok_or(TransportError::Closed)
    }
}
