pub type CmdResult<T> = satops::Result<(T, i32)>;

pub mod publish;
pub mod report;
