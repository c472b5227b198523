mod fault;

pub use self::fault::Fault;
