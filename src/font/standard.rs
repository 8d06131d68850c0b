//! Width table for the built-in Helvetica font
//!
//! Widths are in thousandths of an em, taken from the Helvetica AFM metrics,
//! indexed by WinAnsi code minus 32. Codes 0x7F–0x9F are never emitted by the
//! encoder and carry zero width.

use super::metrics::{FontMetrics, FIRST_CHAR};

/// PostScript name of the fallback font
pub const HELVETICA: &str = "Helvetica";

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 224] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9    :    ;    <    =    >    ?
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // @    A    B    C    D    E    F    G    H    I    J    K    L    M    N    O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // P    Q    R    S    T    U    V    W    X    Y    Z    [    \    ]    ^    _
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // `    a    b    c    d    e    f    g    h    i    j    k    l    m    n    o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // p    q    r    s    t    u    v    w    x    y    z    {    |    }    ~    del
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    // 0x80 - 0x8F (not emitted)
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x90 - 0x9F (not emitted)
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // nbsp ¡   ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À    Á    Â    Ã    Ä    Å    Æ    Ç    È    É    Ê    Ë    Ì    Í    Î    Ï
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð    Ñ    Ò    Ó    Ô    Õ    Ö    ×    Ø    Ù    Ú    Û    Ü    Ý    Þ    ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à    á    â    ã    ä    å    æ    ç    è    é    ê    ë    ì    í    î    ï
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð    ñ    ò    ó    ô    õ    ö    ÷    ø    ù    ú    û    ü    ý    þ    ÿ
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Metrics of the built-in Helvetica font
pub fn helvetica_metrics() -> FontMetrics {
    FontMetrics::new(FIRST_CHAR, HELVETICA_WIDTHS.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TextMeasure;

    #[test]
    fn test_known_widths() {
        let metrics = helvetica_metrics();
        assert_eq!(metrics.width_of(b' '), 278);
        assert_eq!(metrics.width_of(b'M'), 833);
        assert_eq!(metrics.width_of(b'i'), 222);
        assert_eq!(metrics.width_of(0xFC), 556); // ü
        assert_eq!(metrics.width_of(0xDF), 611); // ß
    }

    #[test]
    fn test_measure_scales_with_size() {
        let metrics = helvetica_metrics();
        // M + a + x = 833 + 556 + 500
        assert_eq!(metrics.measure("Max", 1000.0), 1889.0);
        assert_eq!(metrics.measure("", 24.0), 0.0);
    }
}
