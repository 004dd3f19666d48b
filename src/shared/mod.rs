mod memo;

pub(crate) use memo::Memo;
