//! Helper macro so plain #[test] functions can drive async code
//! Many thanks to https://blog.x5ff.xyz/blog/async-tests-tokio-rust/

//! A single shared runtime is used so that sequential `aw!` calls in one
//! test observe the same state. A fresh runtime per call would drop the
//! pooled `:memory:` sqlite connection between statements.

#[cfg(test)]
pub(crate) fn shared_runtime() -> &'static tokio::runtime::Runtime {
    use once_cell::sync::Lazy;
    static RUNTIME: Lazy<tokio::runtime::Runtime> =
        Lazy::new(|| tokio::runtime::Runtime::new().expect("build shared test runtime"));
    &RUNTIME
}

#[cfg(test)]
macro_rules! aw {
    ($e:expr) => {
        crate::async_helper::shared_runtime().block_on($e)
    };
}
