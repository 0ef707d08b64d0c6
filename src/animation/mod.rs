pub(crate) mod anim;
