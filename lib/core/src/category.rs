//! Category table
//!
//! The nine support categories are a closed set. Each variant carries its
//! wire id, a human readable label and the curated example phrases whose
//! embeddings are averaged into the category centroid.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Id returned when no category applies (empty question, empty table).
pub const GENERAL_ID: &str = "genel";

/// Display name paired with [`GENERAL_ID`].
pub const GENERAL_NAME: &str = "Genel Soru";

/// Fixed confidence reported with the general fallback.
pub const GENERAL_CONFIDENCE: f32 = 0.1;

/// Question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Yorum,
    OzelTalep,
    Teknik,
    YanlisHasarli,
    Orijinallik,
    IadeDegisim,
    Stok,
    KargoBilgileri,
    SiparisTeslimat,
}

impl Category {
    /// Every category, in table order. Ties are broken by this order.
    pub const ALL: [Category; 9] = [
        Category::Yorum,
        Category::OzelTalep,
        Category::Teknik,
        Category::YanlisHasarli,
        Category::Orijinallik,
        Category::IadeDegisim,
        Category::Stok,
        Category::KargoBilgileri,
        Category::SiparisTeslimat,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::Yorum => "yorum",
            Category::OzelTalep => "ozel_talep",
            Category::Teknik => "teknik",
            Category::YanlisHasarli => "yanlis_hasarli",
            Category::Orijinallik => "orijinallik",
            Category::IadeDegisim => "iade_degisim",
            Category::Stok => "stok",
            Category::KargoBilgileri => "kargo_bilgileri",
            Category::SiparisTeslimat => "siparis_teslimat",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Yorum => "yorum",
            Category::OzelTalep => "özel talep",
            Category::Teknik => "teknik",
            Category::YanlisHasarli => "Yanlış veya hasarlı ürün",
            Category::Orijinallik => "Orijinallik",
            Category::IadeDegisim => "İade ve değişim",
            Category::Stok => "stok",
            Category::KargoBilgileri => "Kargo bilgileri",
            Category::SiparisTeslimat => "Sipariş teslimat bilgileri",
        }
    }

    /// Example phrases used to build the centroid
    pub fn examples(self) -> &'static [&'static str] {
        match self {
            Category::Yorum => YORUM,
            Category::OzelTalep => OZEL_TALEP,
            Category::Teknik => TEKNIK,
            Category::YanlisHasarli => YANLIS_HASARLI,
            Category::Orijinallik => ORIJINALLIK,
            Category::IadeDegisim => IADE_DEGISIM,
            Category::Stok => STOK,
            Category::KargoBilgileri => KARGO_BILGILERI,
            Category::SiparisTeslimat => SIPARIS_TESLIMAT,
        }
    }

    pub fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_id(s.trim())
            .ok_or_else(|| Error::InvalidConfig(format!("unknown category '{}'", s)))
    }
}

const YORUM: &[&str] = &[
    "Bu ürün çok güzel, beğendim",
    "Ürün hakkında yorum yapabilir misiniz?",
    "Bu ürün kaliteli mi?",
    "Kullanıcı değerlendirmeleri nasıl?",
    "Ürün performansı nasıl?",
    "Bu ürünü tavsiye eder misiniz?",
    "Ürün beklentilerimi karşıladı mı?",
    "Başka kullanıcıların görüşleri nedir?",
    "Ürün hakkındaki genel yorumlar nelerdir?",
    "Ürün hakkında olumlu ve olumsuz yorumlar neler?",
    "Kullanıcıların genel memnuniyeti nedir?",
];

const OZEL_TALEP: &[&str] = &[
    "Özel bir renk istiyorum",
    "Farklı boyutta sipariş verebilir miyim?",
    "Özel paketleme yapabilir misiniz?",
    "Kişiselleştirilmiş ürün alabilir miyim?",
    "Özel sipariş verebilir miyim?",
    "Farklı model istiyorum",
    "Ürün üzerinde değişiklik yapılabilir mi?",
    "Kişiye özel tasarım mümkün mü?",
    "Ürünü istediğim şekilde özelleştirebilir miyim?",
    "Ekstra aksesuar ekleyebilir miyim?",
    "Ürün üzerinde isim yazdırabilir miyim?",
];

const TEKNIK: &[&str] = &[
    "Ürün çalışmıyor, yardım edin",
    "Teknik destek alabilir miyim?",
    "Garanti kapsamında mı?",
    "Servis merkezi nerede?",
    "Ürün arızalı",
    "Teknik sorun yaşıyorum",
    "Ürünün özellikleri hakkında detaylı bilgi alabilir miyim?",
    "Ürün güncelleme veya yazılım desteği var mı?",
    "Cihaz açılmıyor, ne yapmalıyım?",
    "Ürünün garantisi ne kadar?",
    "Teknik kullanım kılavuzu var mı?",
    "Ürünle ilgili sık karşılaşılan teknik sorunlar nelerdir?",
];

const YANLIS_HASARLI: &[&str] = &[
    "Ürün hasarlı geldi",
    "Yanlış ürün gönderildi",
    "Ürün kırık geldi",
    "Eksik parça var",
    "Ürün bozuk geldi",
    "Hatalı ürün aldım",
    "Paketleme yeterli değildi, ürün zarar gördü",
    "Yanlış model gönderilmiş",
    "Ürün beklediğimden farklı ve hasarlı",
    "Ürün tesliminde problem yaşadım",
    "Paket teslim edilirken zarar görmüş",
];

const ORIJINALLIK: &[&str] = &[
    "Bu ürün orijinal mi?",
    "Sahte ürün mü?",
    "Gerçek ürün mü?",
    "Orijinal değil mi?",
    "Bu ürün sahte mi?",
    "Orijinal ürün mü?",
    "Ürünün garantisi var mı?",
    "Markanın lisanslı ürünü mü?",
    "Ürün sertifikalı mı?",
    "Ürünle ilgili sahtecilik şüphesi var mı?",
    "Ürünün üreticisi kimdir?",
];

const IADE_DEGISIM: &[&str] = &[
    "İade etmek istiyorum",
    "Değiştirmek istiyorum",
    "Para iadesi alabilir miyim?",
    "İade şartları neler?",
    "Ürünü değiştirmek istiyorum",
    "İade nasıl yapılır?",
    "Ürünü iade etmek için ne yapmalıyım?",
    "Ürün değişimi mümkün mü?",
    "İade süreci ne kadar sürüyor?",
    "Ürün teslim aldıktan sonra iade edebilir miyim?",
    "İade kargo kodu nereden alınır?",
];

const STOK: &[&str] = &[
    "Bu ürün stokta var mı?",
    "Kaç tane kaldı?",
    "Stok durumu nasıl?",
    "Ne zaman gelir?",
    "Bu ürün mevcut mu?",
    "Stokta kaç tane var?",
    "Ürün tekrar stoklara ne zaman gelecek?",
    "Sipariş vermek için stok yeterli mi?",
    "Stok durumu hakkında bilgi alabilir miyim?",
    "Ürün stokta kalmadı mı?",
    "Stok yenileme süresi nedir?",
];

// Carrier names are listed bare and in short phrases so that one-word
// questions still land here.
const KARGO_BILGILERI: &[&str] = &[
    "Hangi kargo firması?",
    "kargo",
    "kargo firması",
    "kargo ile gönderiyorsunuz",
    "mng",
    "mng kargo",
    "mng ile",
    "mng kargo ile gönderim",
    "yurtiçi",
    "yurtiçi kargo",
    "yurtici",
    "yurtiçi ile",
    "hepsijet",
    "hepsijet kargo",
    "hepsijet ile",
    "aras",
    "aras kargo",
    "aras ile gönderim",
    "dpd",
    "dpd kargo",
    "dpd ile",
    "dhl",
    "dhl kargo",
    "dhl ile gönderim",
    "kargoist",
    "kargoist ile",
    "kargoist kargo",
    "ptt",
    "ptt kargo",
    "ptt ile",
    "kargomsende",
    "kargomsende kargo",
    "kargomsende ile",
    "Kargo takip numarası nedir?",
    "Kargo durumu nasıl?",
    "Kargo bilgisi alabilir miyim?",
    "Kargo firması hangisi?",
    "Kargo takibi yapabilir miyim?",
    "Kargom ne zaman teslim edilir?",
    "Gönderim süresi nedir?",
    "Kargo teslimatında sorun yaşadım",
    "Kargo ile ilgili detaylı bilgi verebilir misiniz?",
    "Kargo teslimat adresini değiştirebilir miyim?",
    "Kargo gecikmesi ile ilgili bilgi almak istiyorum",
];

const SIPARIS_TESLIMAT: &[&str] = &[
    "Siparişim ne zaman teslim edilecek?",
    "Ne zaman gelir?",
    "Teslimat süresi nedir?",
    "Sipariş durumu nasıl?",
    "Siparişim ne zaman gelir?",
    "Teslimat ne zaman?",
    "Siparişimin durumu hakkında bilgi verir misiniz?",
    "Sipariş teslimatı gecikiyor",
    "Ürün teslimat adresimi değiştirebilir miyim?",
    "Siparişimin kargoya verilme süresi nedir?",
    "Siparişle ilgili gecikme yaşanıyor mu?",
];
