pub(crate) mod listeners;
