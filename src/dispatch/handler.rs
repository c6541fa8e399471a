use super::args::RequestArgs;
use super::output::Output;

pub trait Handler: Send + Sync {
    fn call(&self, args: RequestArgs, out: &mut dyn Output);
}

pub type BoxHandler = Box<dyn Handler>;

impl<F> Handler for F
where
    F: Fn(RequestArgs, &mut dyn Output) + Send + Sync,
{
    fn call(&self, args: RequestArgs, out: &mut dyn Output) {
        (self)(args, out)
    }
}
