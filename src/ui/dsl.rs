use crate::core::gfx::BlendMode;
use crate::ui::actors::{Actor, SpriteSource};

#[inline(always)]
pub fn finish_sprite(
    texture: String,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    hx: f32,
    vy: f32,
    tint: [f32; 4],
    z: i16,
    rot_z_deg: f32,
    visible: bool,
    blend: BlendMode,
) -> Actor {
    Actor::Sprite {
        align: [hx, vy],
        offset: [x, y],
        size: [w, h],
        source: SpriteSource::Texture(texture),
        tint,
        z,
        rot_z_deg,
        visible,
        blend,
    }
}

#[inline(always)]
pub fn finish_quad(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    hx: f32,
    vy: f32,
    tint: [f32; 4],
    z: i16,
    rot_z_deg: f32,
    visible: bool,
    blend: BlendMode,
) -> Actor {
    Actor::Sprite {
        align: [hx, vy],
        offset: [x, y],
        size: [w, h],
        source: SpriteSource::Solid,
        tint,
        z,
        rot_z_deg,
        visible,
        blend,
    }
}

#[inline(always)]
pub fn finish_text(
    content: String,
    x: f32,
    y: f32,
    hx: f32,
    vy: f32,
    px: f32,
    color: [f32; 4],
    font: &'static str,
    zoom: f32,
    z: i16,
) -> Actor {
    Actor::Text {
        align: [hx, vy],
        offset: [x, y],
        px,
        color,
        font,
        content,
        zoom,
        z,
    }
}

/// Public macro:
///   `act!(sprite("tex"): align(...): xy(...): zoomto(...): diffuse(...))`
///   `act!(quad: align(...): xy(...): zoomto(...): diffuse(...))`
///   `act!(text: font("arcade"): settext("hi"): xy(...): px(...))`
#[macro_export]
macro_rules! act {
    (sprite($tex:expr): $($tail:tt)+) => {{
        #[allow(unused_mut, unused_assignments)]
        let actor = {
            use $crate::core::gfx::BlendMode;
            let (mut x, mut y, mut w, mut h) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
            let (mut hx, mut vy) = (0.5f32, 0.5f32);
            let mut tint: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
            let mut z: i16 = 0;
            let mut rot: f32 = 0.0;
            let mut visible: bool = true;
            let mut blend: BlendMode = BlendMode::Alpha;

            $crate::__ui_act_apply!( ($($tail)+) x y w h hx vy tint z rot visible blend );

            $crate::ui::dsl::finish_sprite(
                ($tex).into(), x, y, w, h, hx, vy, tint, z, rot, visible, blend,
            )
        };
        actor
    }};
    (quad: $($tail:tt)+) => {{
        #[allow(unused_mut, unused_assignments)]
        let actor = {
            use $crate::core::gfx::BlendMode;
            let (mut x, mut y, mut w, mut h) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
            let (mut hx, mut vy) = (0.5f32, 0.5f32);
            let mut tint: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
            let mut z: i16 = 0;
            let mut rot: f32 = 0.0;
            let mut visible: bool = true;
            let mut blend: BlendMode = BlendMode::Alpha;

            $crate::__ui_act_apply!( ($($tail)+) x y w h hx vy tint z rot visible blend );

            $crate::ui::dsl::finish_quad(x, y, w, h, hx, vy, tint, z, rot, visible, blend)
        };
        actor
    }};
    (text: $($tail:tt)+) => {{
        #[allow(unused_mut, unused_assignments)]
        let actor = {
            let (mut x, mut y) = (0.0f32, 0.0f32);
            let (mut hx, mut vy) = (0.5f32, 0.5f32);
            let mut px: f32 = 16.0;
            let mut tint: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
            let mut font: &'static str = "arcade";
            let mut content: String = String::new();
            let mut zoom: f32 = 1.0;
            let mut z: i16 = 0;

            $crate::__ui_act_apply_text!( ($($tail)+) x y hx vy px tint font content zoom z );

            $crate::ui::dsl::finish_text(content, x, y, hx, vy, px, tint, font, zoom, z)
        };
        actor
    }};
}

/// Internal: command list muncher (`cmd(args): cmd2(...): ...`)
#[doc(hidden)]
#[macro_export]
macro_rules! __ui_act_apply {
    ( () $($vars:ident)+ ) => { () };

    // consume one `cmd(args):` then recurse for more
    ( ($cmd:ident ( $($args:tt)* ) : $($rest:tt)* )
      $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident
      $tint:ident $z:ident $rot:ident $visible:ident $blend:ident
    ) => {{
        $crate::__ui_act_apply_one!( $cmd ( $($args)* ) $x $y $w $h $hx $vy $tint $z $rot $visible $blend );
        $crate::__ui_act_apply!( ($($rest)*) $x $y $w $h $hx $vy $tint $z $rot $visible $blend );
    }};

    // final `cmd(args)` with no trailing colon
    ( ($cmd:ident ( $($args:tt)* ) )
      $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident
      $tint:ident $z:ident $rot:ident $visible:ident $blend:ident
    ) => {{
        $crate::__ui_act_apply_one!( $cmd ( $($args)* ) $x $y $w $h $hx $vy $tint $z $rot $visible $blend );
    }};
}

/// Internal: single-command handlers.
#[doc(hidden)]
#[macro_export]
macro_rules! __ui_act_apply_one {
    (xy ($xv:expr, $yv:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $x = ($xv) as f32;
        $y = ($yv) as f32;
    };
    (x ($xv:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $x = ($xv) as f32;
    };
    (y ($yv:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $y = ($yv) as f32;
    };
    (align ($hv:expr, $vv:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $hx = ($hv) as f32;
        $vy = ($vv) as f32;
    };
    (zoomto ($nw:expr, $nh:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $w = ($nw) as f32;
        $h = ($nh) as f32;
    };
    (setsize ($nw:expr, $nh:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $w = ($nw) as f32;
        $h = ($nh) as f32;
    };
    (diffuse ($r:expr, $g:expr, $b:expr, $a:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $tint = [($r) as f32, ($g) as f32, ($b) as f32, ($a) as f32];
    };
    (rgba ($c:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $tint = $c;
    };
    (diffusealpha ($a:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $tint[3] = ($a) as f32;
    };
    (z ($v:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $z = ($v) as i16;
    };
    (rotate ($v:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $rot = ($v) as f32;
    };
    (visible ($v:expr) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $visible = $v;
    };
    (blend (alpha) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $blend = $crate::core::gfx::BlendMode::Alpha;
    };
    (blend (add) $x:ident $y:ident $w:ident $h:ident $hx:ident $vy:ident $tint:ident $z:ident $rot:ident $visible:ident $blend:ident) => {
        $blend = $crate::core::gfx::BlendMode::Add;
    };
    // Friendly error for unknown commands
    ($other:ident ( $($args:tt)* ) $($rest:tt)*) => {
        compile_error!(concat!("act!: unknown command: ", stringify!($other)));
    };
}

/// Internal muncher for `act!(text: ...)` commands
#[doc(hidden)]
#[macro_export]
macro_rules! __ui_act_apply_text {
    ( () $($vars:ident)+ ) => { () };
    ( ($cmd:ident $args:tt : $($rest:tt)* )
      $x:ident $y:ident $hx:ident $vy:ident $px:ident
      $tint:ident $font:ident $content:ident $zoom:ident $z:ident
    ) => {{
        $crate::__ui_act_apply_one_text!( $cmd $args $x $y $hx $vy $px $tint $font $content $zoom $z );
        $crate::__ui_act_apply_text!( ($($rest)*) $x $y $hx $vy $px $tint $font $content $zoom $z );
    }};
    ( ($cmd:ident $args:tt )
      $x:ident $y:ident $hx:ident $vy:ident $px:ident
      $tint:ident $font:ident $content:ident $zoom:ident $z:ident
    ) => {{
        $crate::__ui_act_apply_one_text!( $cmd $args $x $y $hx $vy $px $tint $font $content $zoom $z );
    }};
}

/// Single-command handlers for `act!(text: ...)`
#[doc(hidden)]
#[macro_export]
macro_rules! __ui_act_apply_one_text {
    (xy ($xv:expr, $yv:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $x = ($xv) as f32;
        $y = ($yv) as f32;
    };
    (x ($xv:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $x = ($xv) as f32;
    };
    (y ($yv:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $y = ($yv) as f32;
    };
    (align ($hv:expr, $vv:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $hx = ($hv) as f32;
        $vy = ($vv) as f32;
    };
    (px ($s:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $px = ($s) as f32;
    };
    (diffuse ($r:expr, $g:expr, $b:expr, $a:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $tint = [($r) as f32, ($g) as f32, ($b) as f32, ($a) as f32];
    };
    (rgba ($c:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $tint = $c;
    };
    (diffusealpha ($a:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $tint[3] = ($a) as f32;
    };
    (font ($name:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $font = $name;
    };
    (settext ($txt:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $content = ($txt).into();
    };
    (text ($txt:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $content = ($txt).into();
    };
    (zoom ($s:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $zoom = ($s) as f32;
    };
    (z ($v:expr) $x:ident $y:ident $hx:ident $vy:ident $px:ident $tint:ident $font:ident $content:ident $zoom:ident $z:ident) => {
        $z = ($v) as i16;
    };
    // Friendly error for unknown commands
    ($other:ident $($anything:tt)*) => {
        compile_error!(concat!("act!(text): unknown command: ", stringify!($other)));
    };
}
