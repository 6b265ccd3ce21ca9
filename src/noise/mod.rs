pub(crate) mod injector;
