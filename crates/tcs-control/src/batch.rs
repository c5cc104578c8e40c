//! # 批量工位加载
//!
//! 从无表头 CSV 读取工位坐标，每行 `index,c1,c2,...`，逐条下发到控制器。
//! 全部记录先解析完毕再开始发送，解析失败时不会发送任何命令。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tcs_client::{StationDriver, StationIndex};
use tcs_driver::{CommandError, CommandResult};
use tcs_protocol::{CoordinateSystem, Position};
use tcs_transport::LineTransport;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 批量加载错误
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to open station file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 行号从 1 开始
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("Station upload stopped: {0}")]
    Command(#[from] CommandError),
}

/// 一条工位记录
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station: StationIndex,
    pub position: Position,
}

/// 解析全部记录
///
/// 空行（或只含空白的行）被跳过；索引不是整数或坐标不是数字时返回
/// `BatchError::InvalidRecord`。
pub fn read_records<R: Read>(reader: R) -> Result<Vec<StationRecord>, BatchError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let line = row.position().map_or(0, |p| p.line());

        let mut fields = row.iter();
        let Some(index) = fields.next() else {
            continue;
        };
        let coords: Vec<&str> = fields.collect();
        let station = index.parse::<i32>().map_err(|_| BatchError::InvalidRecord {
            line,
            reason: format!("station index {index:?} is not an integer"),
        })?;
        let position = Position::from_tokens(&coords).map_err(|e| BatchError::InvalidRecord {
            line,
            reason: e.to_string(),
        })?;

        records.push(StationRecord {
            station: StationIndex(station),
            position,
        });
    }

    debug!("Parsed {} station records", records.len());
    Ok(records)
}

pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<StationRecord>, BatchError> {
    read_records(File::open(path)?)
}

/// 按顺序下发记录
///
/// 遇到第一个失败即停止并原样返回该失败，之后的记录不会发送。
/// 成功时返回下发的记录数。
pub fn apply_records<T: LineTransport>(
    driver: &mut StationDriver<T>,
    records: &[StationRecord],
    system: impl Into<Option<CoordinateSystem>>,
) -> CommandResult<usize> {
    let system = system.into();
    for (applied, record) in records.iter().enumerate() {
        if let Err(e) = driver.set_station(record.station, &record.position, system) {
            warn!(
                "Station {} failed after {} of {} records: {}",
                record.station,
                applied,
                records.len(),
                e
            );
            return Err(e);
        }
    }
    Ok(records.len())
}

/// 读取 CSV 文件并下发全部工位
pub fn load_csv<T: LineTransport>(
    driver: &mut StationDriver<T>,
    path: impl AsRef<Path>,
    system: impl Into<Option<CoordinateSystem>>,
) -> Result<usize, BatchError> {
    let path = path.as_ref();
    let records = read_records_from_path(path)?;
    let applied = apply_records(driver, &records, system)?;
    info!("Loaded {} stations from {}", applied, path.display());
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tcs_driver::{FailureKind, SessionConfig};
    use tcs_transport::mock::{ScriptedTransport, Simulator};

    #[test]
    fn test_read_records() {
        let input = "1, 4, 8, 4\n\n2,1.5,2,3,0,0,90\n   \n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].station, StationIndex(1));
        assert_eq!(records[0].position, Position::from([4.0, 8.0, 4.0]));
        assert_eq!(records[1].position.coords()[0], 1.5);
        assert_eq!(records[1].position.len(), 6);
    }

    #[test]
    fn test_invalid_index_reports_line() {
        let input = "1,0,0,0\nfoo,1,2,3\n";
        match read_records(input.as_bytes()).unwrap_err() {
            BatchError::InvalidRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("foo"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_coordinate() {
        let input = "1,0,x,0\n";
        assert!(matches!(
            read_records(input.as_bytes()),
            Err(BatchError::InvalidRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_index_without_coordinates() {
        assert!(matches!(
            read_records("3\n".as_bytes()),
            Err(BatchError::InvalidRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_apply_stops_at_first_failure() {
        let handle = ScriptedTransport::with_replies(["0", "0 1", "-1", "0 3"]);
        let mut driver = StationDriver::open(handle.clone(), SessionConfig::default()).unwrap();
        let records = read_records("1,1,2,3\n2,1,2,3\n3,1,2,3\n".as_bytes()).unwrap();

        let err = apply_records(&mut driver, &records, CoordinateSystem::Joint).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ControllerRejected);
        assert_eq!(err.command().to_string(), "locAngles 2 1 2 3");
        assert_eq!(
            handle.sent_lines(),
            vec!["attach 1", "locAngles 1 1 2 3", "locAngles 2 1 2 3"]
        );
    }

    #[test]
    fn test_load_csv_into_simulator() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,10,20,30,0,0,0").unwrap();
        writeln!(file, "2,11,21,31,0,0,0").unwrap();
        file.flush().unwrap();

        let sim = Simulator::new();
        let mut driver = StationDriver::open(sim.clone(), SessionConfig::default()).unwrap();
        let applied = load_csv(&mut driver, file.path(), None).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(sim.station_count(), 2);
        assert!(sim.received_lines().contains(&"locXyz 2 11 21 31 0 0 0".to_string()));
    }

    #[test]
    fn test_load_csv_missing_file() {
        let sim = Simulator::new();
        let mut driver = StationDriver::open(sim, SessionConfig::default()).unwrap();
        let err = load_csv(&mut driver, "/nonexistent/stations.csv", None).unwrap_err();
        assert!(matches!(err, BatchError::Io(_)));
    }

    #[test]
    fn test_load_csv_parse_error_sends_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,1,2,3").unwrap();
        writeln!(file, "2,oops").unwrap();
        file.flush().unwrap();

        let sim = Simulator::new();
        let mut driver = StationDriver::open(sim.clone(), SessionConfig::default()).unwrap();
        let err = load_csv(&mut driver, file.path(), None).unwrap_err();
        assert!(matches!(err, BatchError::InvalidRecord { line: 2, .. }));
        assert_eq!(sim.received_lines(), vec!["attach 1"]);
    }
}
